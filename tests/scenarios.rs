use anyhow::Context;
use product_supply::{
    config::StorageConfig,
    dispatch::{CompleteSupplyMessage, CompletionDispatcher, DispatchOutcome},
    edit::{SupplyEditDto, SupplyEditor},
    error::EditRejected,
    logging,
    registry::StatusRegistry,
    service::SupplyService,
    status::SupplyStatus,
    supply::{ProductKey, SupplyId, SupplyProduct},
};
use std::sync::Arc;

use tempfile::{TempDir, tempdir}; // Use for test db cleanup.

// Sled locks its directory, so every test opens its own database under a
// temporary directory. The directory has to outlive the service.
fn open_service(name: &str) -> anyhow::Result<(TempDir, SupplyService)> {
    logging::init_test();

    let temp_dir = tempdir()?;
    let config = StorageConfig {
        path: temp_dir.path().join(name),
        temporary: false,
    };
    let service = SupplyService::open(&config, Arc::new(StatusRegistry::builtin()))?;

    Ok((temp_dir, service))
}

fn boots() -> ProductKey {
    ProductKey::new("boots").set_offer("black").set_variation("42")
}

fn jacket() -> ProductKey {
    ProductKey::new("jacket").set_modification("xl")
}

fn new_supply() -> SupplyEditDto {
    SupplyEditDto::new()
        .set_container("MSKU1234567")
        .set_declaration("10702010/150624/3012345")
        .set_personal("user_warehouse", Some("profile_main".into()))
        .add_product(SupplyProduct::new(boots(), 24))
        .add_product(SupplyProduct::new(jacket(), 10))
}

#[test]
fn receive_everything_then_complete() -> anyhow::Result<()> {
    let (_dir, service) = open_service("test_complete.db")?;

    let supply = service
        .create_supply(new_supply())
        .context("Supply failed on create: ")?;
    assert_eq!(
        service.current_status(&supply.id)?.unwrap(),
        SupplyStatus::New
    );

    // the shipment is on its way
    let in_delivery = service.edit_draft(&supply.id)?.set_status(SupplyStatus::Delivery);
    service.submit_edit(in_delivery)?;

    let dispatcher = CompletionDispatcher::new(&service, &service);

    let message = service.receive_product(&supply.id, &boots())?;
    assert_eq!(dispatcher.handle(&message), DispatchOutcome::NotEligible);
    assert_eq!(
        service.current_status(&supply.id)?.unwrap(),
        SupplyStatus::Delivery
    );

    let message = service.receive_product(&supply.id, &jacket())?;
    let outcome = dispatcher.handle(&message);
    assert!(outcome.is_completed());
    assert_eq!(
        service.current_status(&supply.id)?.unwrap(),
        SupplyStatus::Completed
    );

    // created, delivery, two receipts, completed. Newest first.
    let history = service.history(&supply.id)?;
    let statuses: Vec<&str> = history.iter().map(|event| event.status().as_str()).collect();
    assert_eq!(
        statuses,
        vec!["completed", "delivery", "delivery", "delivery", "new"]
    );

    // earlier snapshots are left untouched
    let first = history.last().unwrap();
    assert!(first.previous().is_none());
    assert!(first.products().iter().all(|product| !product.received));
    assert_eq!(first.invariable().container.as_deref(), Some("MSKU1234567"));
    assert!(history[0].all_received());
    assert!(history.windows(2).all(|pair| pair[0].created() >= pair[1].created()));

    Ok(())
}

#[test]
fn dispatch_for_unknown_supply_is_missing_aggregate() -> anyhow::Result<()> {
    let (_dir, service) = open_service("test_missing.db")?;

    let dispatcher = CompletionDispatcher::new(&service, &service);
    let outcome = dispatcher.handle(&CompleteSupplyMessage::new(SupplyId::generate()?));

    assert_eq!(outcome, DispatchOutcome::MissingAggregate);

    Ok(())
}

#[test]
fn receiving_twice_writes_one_event() -> anyhow::Result<()> {
    let (_dir, service) = open_service("test_receive_twice.db")?;
    let supply = service.create_supply(new_supply())?;

    service.receive_product(&supply.id, &boots())?;
    service.receive_product(&supply.id, &boots())?;

    assert_eq!(service.history(&supply.id)?.len(), 2);

    Ok(())
}

#[test]
fn receiving_an_unknown_product_fails() -> anyhow::Result<()> {
    let (_dir, service) = open_service("test_unknown_product.db")?;
    let supply = service.create_supply(new_supply())?;

    let err = service
        .receive_product(&supply.id, &ProductKey::new("hat"))
        .unwrap_err();

    assert_eq!(
        err.downcast_ref::<EditRejected>(),
        Some(&EditRejected::UnknownProduct("hat".into()))
    );
    assert_eq!(service.history(&supply.id)?.len(), 1);

    Ok(())
}

#[test]
fn edit_rejects_unknown_status() -> anyhow::Result<()> {
    let (_dir, service) = open_service("test_unknown_status.db")?;
    let supply = service.create_supply(new_supply())?;

    let edit = service.edit_draft(&supply.id)?.set_status("lost");

    assert_eq!(
        service.submit_edit(edit),
        Err(EditRejected::UnknownStatus("lost".into()))
    );
    assert_eq!(
        service.current_status(&supply.id)?.unwrap(),
        SupplyStatus::New
    );

    Ok(())
}

#[test]
fn edit_of_unknown_supply_is_rejected() -> anyhow::Result<()> {
    let (_dir, service) = open_service("test_edit_unknown.db")?;
    let ghost = SupplyId::from("supply_ghost");

    assert_eq!(
        service.submit_edit(new_supply().set_supply(ghost)),
        Err(EditRejected::SupplyNotFound("supply_ghost".into()))
    );
    assert_eq!(
        service.submit_edit(new_supply()),
        Err(EditRejected::MissingSupply)
    );

    Ok(())
}

#[test]
fn create_with_explicit_status() -> anyhow::Result<()> {
    let (_dir, service) = open_service("test_explicit_status.db")?;

    let supply = service.create_supply(new_supply().set_status(SupplyStatus::Clearance))?;

    assert_eq!(
        service.current_status(&supply.id)?.unwrap(),
        SupplyStatus::Clearance
    );
    assert!(service.create_supply(new_supply().set_supply(supply.id)).is_err());

    Ok(())
}

#[test]
fn temporary_store_from_config() -> anyhow::Result<()> {
    let config = StorageConfig {
        temporary: true,
        ..StorageConfig::default()
    };
    let service = SupplyService::open(&config, Arc::new(StatusRegistry::builtin()))?;

    let supply = service.create_supply(new_supply())?;

    assert_eq!(service.history(&supply.id)?.len(), 1);
    assert_eq!(service.registry().all().len(), SupplyStatus::ALL.len());

    Ok(())
}

#[test]
fn repeated_completion_writes_one_completed_event() -> anyhow::Result<()> {
    let (_dir, service) = open_service("test_repeated_completion.db")?;
    let supply = service.create_supply(
        SupplyEditDto::new().add_product(SupplyProduct::new(ProductKey::new("p1"), 1)),
    )?;
    let dispatcher = CompletionDispatcher::new(&service, &service);

    let message = service.receive_product(&supply.id, &ProductKey::new("p1"))?;
    assert!(dispatcher.handle(&message).is_completed());

    // a redelivered receipt produces the same message again
    let message = service.receive_product(&supply.id, &ProductKey::new("p1"))?;
    assert_eq!(dispatcher.handle(&message), DispatchOutcome::AlreadyCompleted);

    let statuses: Vec<String> = service
        .history(&supply.id)?
        .iter()
        .map(|event| event.status().to_string())
        .collect();
    assert_eq!(statuses, vec!["completed", "new", "new"]);

    Ok(())
}

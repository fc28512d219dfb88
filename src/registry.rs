//! Ordered catalog of supply statuses and the sequence queries over it
use super::error::StatusError;
use super::status::{Status, StatusName, SupplyStatus};
use std::collections::HashSet;
use tracing::debug;

/// Statuses sorted by priority. Built once, then shared read-only
/// (usually behind an `Arc`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRegistry {
    // never empty, sorted ascending by priority
    statuses: Vec<Status>,
}

impl StatusRegistry {
    /// Registers the given variants. Equal priorities keep the order in which
    /// the variants were given.
    pub fn new<I, S>(variants: I) -> Result<Self, StatusError>
    where
        I: IntoIterator<Item = S>,
        S: Into<Status>,
    {
        let mut statuses: Vec<Status> = variants.into_iter().map(Into::into).collect();

        if statuses.is_empty() {
            return Err(StatusError::Configuration);
        }

        let mut seen = HashSet::new();
        for status in &statuses {
            if !seen.insert(status.identifier()) {
                return Err(StatusError::DuplicateStatus(status.identifier().to_string()));
            }
        }

        // stable sort
        statuses.sort_by_key(Status::priority);

        debug!(
            statuses = ?statuses.iter().map(Status::identifier).collect::<Vec<_>>(),
            "supply status registry built"
        );

        Ok(Self { statuses })
    }

    /// The built-in lifecycle: new, clearance, delivery, completed, cancel.
    pub fn builtin() -> Self {
        let mut statuses: Vec<Status> = SupplyStatus::ALL.into_iter().map(Status::from).collect();
        statuses.sort_by_key(Status::priority);

        Self { statuses }
    }

    /// The built-in lifecycle extended with additional variants.
    pub fn with_builtin<I>(extra: I) -> Result<Self, StatusError>
    where
        I: IntoIterator<Item = Status>,
    {
        Self::new(
            SupplyStatus::ALL
                .into_iter()
                .map(Status::from)
                .chain(extra),
        )
    }

    pub fn all(&self) -> &[Status] {
        &self.statuses
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Status> {
        self.statuses.iter()
    }

    /// The status a new supply starts in (lowest priority).
    pub fn initial(&self) -> &Status {
        &self.statuses[0]
    }

    pub fn contains<N: StatusName + ?Sized>(&self, name: &N) -> bool {
        self.position(name).is_ok()
    }

    pub fn by_name<N: StatusName + ?Sized>(&self, name: &N) -> Result<&Status, StatusError> {
        self.position(name).map(|index| &self.statuses[index])
    }

    /// The status ordered immediately before `status`, `None` for the first one.
    pub fn previous<N: StatusName + ?Sized>(
        &self,
        status: &N,
    ) -> Result<Option<&Status>, StatusError> {
        let index = self.position(status)?;

        Ok(index.checked_sub(1).map(|prev| &self.statuses[prev]))
    }

    /// The status ordered immediately after `status`, `None` for the last one.
    pub fn next<N: StatusName + ?Sized>(&self, status: &N) -> Result<Option<&Status>, StatusError> {
        let index = self.position(status)?;

        Ok(self.statuses.get(index + 1))
    }

    fn position<N: StatusName + ?Sized>(&self, name: &N) -> Result<usize, StatusError> {
        let name = name.status_name();

        self.statuses
            .iter()
            .position(|status| status.identifier() == name)
            .ok_or_else(|| StatusError::UnknownStatus(name.to_string()))
    }
}

impl Default for StatusRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<'a> IntoIterator for &'a StatusRegistry {
    type Item = &'a Status;
    type IntoIter = std::slice::Iter<'a, Status>;

    fn into_iter(self) -> Self::IntoIter {
        self.statuses.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_matches_explicit_registration() {
        let explicit = StatusRegistry::new(SupplyStatus::ALL).unwrap();

        assert_eq!(StatusRegistry::builtin(), explicit);
    }

    #[test]
    fn rejects_duplicate_identifiers() {
        let result = StatusRegistry::with_builtin([Status::new("new", 50, "#ffffff", "ROLE_X")]);

        assert_eq!(result, Err(StatusError::DuplicateStatus("new".into())));
    }

    #[test]
    fn next_mirrors_previous() {
        let registry = StatusRegistry::builtin();

        assert_eq!(registry.next("clearance").unwrap().unwrap(), "delivery");
        assert_eq!(registry.next("cancel").unwrap(), None);
        assert!(registry.next("lost").is_err());
    }
}

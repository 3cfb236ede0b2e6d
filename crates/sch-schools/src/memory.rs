use super::*;
use sch_pg::StoreErr;
use std::sync::Mutex;
use std::sync::PoisonError;

/// In-process school store.
///
/// Backs the `--memory` development mode and the HTTP tests. Name
/// uniqueness is checked and enforced under the same lock as the insert.
#[derive(Debug, Default)]
pub struct Memory {
    rows: Mutex<Vec<School>>,
    offline: bool,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that fails every operation as if storage were unreachable.
    pub fn offline() -> Self {
        Self {
            rows: Mutex::default(),
            offline: true,
        }
    }

    fn reachable(&self) -> Result<(), StoreErr> {
        match self.offline {
            true => Err(StoreErr::Offline),
            false => Ok(()),
        }
    }

    fn rows(&self) -> std::sync::MutexGuard<'_, Vec<School>> {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait::async_trait]
impl SchoolRepository for Memory {
    async fn ping(&self) -> Result<(), StoreErr> {
        self.reachable()
    }

    async fn exists(&self, name: &str) -> Result<bool, StoreErr> {
        self.reachable()?;
        Ok(self.rows().iter().any(|s| s.name == name))
    }

    async fn insert(&self, school: &NewSchool) -> Result<Option<i32>, StoreErr> {
        self.reachable()?;
        let mut rows = self.rows();
        if rows.iter().any(|s| s.name == school.name) {
            return Ok(None);
        }
        let id = rows.last().map_or(1, |s| s.id + 1);
        rows.push(school.clone().stored(id));
        Ok(Some(id))
    }

    async fn schools(&self) -> Result<Vec<SchoolSummary>, StoreErr> {
        self.reachable()?;
        Ok(self.rows().iter().rev().map(SchoolSummary::from).collect())
    }

    async fn school(&self, id: i32) -> Result<Option<School>, StoreErr> {
        self.reachable()?;
        Ok(self.rows().iter().find(|s| s.id == id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> NewSchool {
        NewSchool {
            name: name.to_string(),
            address: "1 Elm St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            contact: "555-0100".to_string(),
            email_id: "a@b.com".to_string(),
            image: None,
        }
    }

    #[tokio::test]
    async fn ids_increase_and_list_descends() {
        let store = Memory::new();
        assert_eq!(store.insert(&named("A")).await.unwrap(), Some(1));
        assert_eq!(store.insert(&named("B")).await.unwrap(), Some(2));
        assert_eq!(store.insert(&named("C")).await.unwrap(), Some(3));
        let ids = store
            .schools()
            .await
            .unwrap()
            .iter()
            .map(|s| s.id)
            .collect::<Vec<_>>();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn duplicate_name_is_refused() {
        let store = Memory::new();
        assert!(store.insert(&named("Oak")).await.unwrap().is_some());
        assert!(store.exists("Oak").await.unwrap());
        assert_eq!(store.insert(&named("Oak")).await.unwrap(), None);
        assert_eq!(store.schools().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn names_match_exactly() {
        let store = Memory::new();
        store.insert(&named("Oak")).await.unwrap();
        assert!(!store.exists("oak").await.unwrap());
        assert!(!store.exists("Oak ").await.unwrap());
    }

    #[tokio::test]
    async fn fetch_returns_full_row() {
        let store = Memory::new();
        let id = store.insert(&named("Oak")).await.unwrap().unwrap();
        let row = store.school(id).await.unwrap().unwrap();
        assert_eq!(row, named("Oak").stored(id));
        assert_eq!(store.school(id + 1).await.unwrap(), None);
    }

    #[tokio::test]
    async fn offline_store_fails_everything() {
        let store = Memory::offline();
        assert!(matches!(store.ping().await, Err(StoreErr::Offline)));
        assert!(matches!(store.exists("x").await, Err(StoreErr::Offline)));
        assert!(matches!(store.insert(&named("x")).await, Err(StoreErr::Offline)));
        assert!(matches!(store.schools().await, Err(StoreErr::Offline)));
        assert!(matches!(store.school(1).await, Err(StoreErr::Offline)));
    }
}

use super::*;
use sch_pg::*;
use tokio_postgres::Row;

/// Repository trait for school storage operations.
/// Abstracts SQL from the route layer; handlers receive it as a trait object.
#[async_trait::async_trait]
pub trait SchoolRepository: Send + Sync {
    /// Trivial round trip to prove storage is reachable.
    async fn ping(&self) -> Result<(), StoreErr>;
    /// Exact-match lookup of an existing name.
    async fn exists(&self, name: &str) -> Result<bool, StoreErr>;
    /// Inserts a row and returns its id, or `None` if the name is taken.
    async fn insert(&self, school: &NewSchool) -> Result<Option<i32>, StoreErr>;
    /// All rows, most recently inserted first.
    async fn schools(&self) -> Result<Vec<SchoolSummary>, StoreErr>;
    async fn school(&self, id: i32) -> Result<Option<School>, StoreErr>;
}

#[async_trait::async_trait]
impl SchoolRepository for Postgres {
    async fn ping(&self) -> Result<(), StoreErr> {
        self.client()?
            .execute("SELECT 1", &[])
            .await
            .map(|_| ())
            .map_err(StoreErr::from)
    }

    async fn exists(&self, name: &str) -> Result<bool, StoreErr> {
        self.client()?
            .query_one(
                const_format::concatcp!(
                    "SELECT EXISTS (SELECT 1 FROM ",
                    SCHOOLS,
                    " WHERE name = $1)"
                ),
                &[&name],
            )
            .await?
            .try_get::<_, bool>(0)
            .map_err(StoreErr::from)
    }

    async fn insert(&self, school: &NewSchool) -> Result<Option<i32>, StoreErr> {
        self.client()?
            .query_opt(
                const_format::concatcp!(
                    "INSERT INTO ",
                    SCHOOLS,
                    " (name, address, city, state, contact, image, email_id)
                      VALUES ($1, $2, $3, $4, $5, $6, $7)
                      ON CONFLICT DO NOTHING
                      RETURNING id"
                ),
                &[
                    &school.name,
                    &school.address,
                    &school.city,
                    &school.state,
                    &school.contact,
                    &school.image,
                    &school.email_id,
                ],
            )
            .await?
            .map(|row| row.try_get::<_, i32>(0))
            .transpose()
            .map_err(StoreErr::from)
    }

    async fn schools(&self) -> Result<Vec<SchoolSummary>, StoreErr> {
        self.client()?
            .query(
                const_format::concatcp!(
                    "SELECT id, name, address, city, image FROM ",
                    SCHOOLS,
                    " ORDER BY id DESC"
                ),
                &[],
            )
            .await?
            .iter()
            .map(SchoolSummary::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(StoreErr::from)
    }

    async fn school(&self, id: i32) -> Result<Option<School>, StoreErr> {
        self.client()?
            .query_opt(
                const_format::concatcp!(
                    "SELECT id, name, address, city, state, contact, image, email_id FROM ",
                    SCHOOLS,
                    " WHERE id = $1"
                ),
                &[&id],
            )
            .await?
            .as_ref()
            .map(School::try_from)
            .transpose()
            .map_err(StoreErr::from)
    }
}

/// Column types are checked on decode; a mismatch surfaces as
/// [`StoreErr::Query`] rather than a panic.
impl TryFrom<&Row> for School {
    type Error = PgErr;
    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.try_get::<_, i32>(0)?,
            name: row.try_get::<_, String>(1)?,
            address: row.try_get::<_, String>(2)?,
            city: row.try_get::<_, String>(3)?,
            state: row.try_get::<_, String>(4)?,
            contact: row.try_get::<_, String>(5)?,
            image: row.try_get::<_, Option<String>>(6)?,
            email_id: row.try_get::<_, String>(7)?,
        })
    }
}

impl TryFrom<&Row> for SchoolSummary {
    type Error = PgErr;
    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.try_get::<_, i32>(0)?,
            name: row.try_get::<_, String>(1)?,
            address: row.try_get::<_, String>(2)?,
            city: row.try_get::<_, String>(3)?,
            image: row.try_get::<_, Option<String>>(4)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decodes<T>()
    where
        T: for<'r> TryFrom<&'r Row, Error = PgErr>,
    {
    }

    #[test]
    fn rows_decode_fallibly() {
        decodes::<School>();
        decodes::<SchoolSummary>();
    }
}

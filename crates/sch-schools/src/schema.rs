use super::*;
use sch_pg::*;

impl Schema for School {
    fn name() -> &'static str {
        SCHOOLS
    }
    fn creates() -> &'static str {
        const_format::concatcp!(
            "CREATE TABLE IF NOT EXISTS ",
            SCHOOLS,
            " (
                id          SERIAL PRIMARY KEY,
                name        VARCHAR(255) NOT NULL,
                address     TEXT NOT NULL,
                city        VARCHAR(100) NOT NULL,
                state       VARCHAR(100) NOT NULL,
                contact     VARCHAR(50) NOT NULL,
                image       TEXT,
                email_id    VARCHAR(255) NOT NULL
            );"
        )
    }
    fn indices() -> &'static str {
        const_format::concatcp!(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_schools_name ON ",
            SCHOOLS,
            " (name);"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_unique_in_storage() {
        assert!(School::indices().contains("UNIQUE INDEX"));
        assert!(School::indices().contains("schools (name)"));
    }

    #[test]
    fn table_carries_every_column() {
        let ddl = School::creates();
        for column in ["id", "name", "address", "city", "state", "contact", "image", "email_id"] {
            assert!(ddl.contains(column), "{column}");
        }
        assert!(ddl.starts_with("CREATE TABLE IF NOT EXISTS schools"));
    }
}

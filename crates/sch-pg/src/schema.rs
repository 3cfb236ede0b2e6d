/// Schema metadata for PostgreSQL tables.
///
/// Pure description of table structure; no I/O. All methods return
/// `&'static str` so statements can be assembled at compile time with
/// `const_format::concatcp!`.
pub trait Schema {
    /// Returns the table name in the database.
    fn name() -> &'static str;
    /// Returns `CREATE TABLE IF NOT EXISTS` DDL statement.
    fn creates() -> &'static str;
    /// Returns `CREATE INDEX IF NOT EXISTS` statements for all indices.
    fn indices() -> &'static str;
}

//! SQL rendering shared by the SQL-speaking sources
//!
//! Identifiers come from [`TableRef`] and [`ColumnName`], which are validated
//! on construction, so they are spliced into the statement text. Integers are
//! inlined as well; no user-supplied string ever reaches the SQL.

use crate::domain::{ColumnName, ExportPredicate, RowQuery, TableRef};

/// Alias of the count column
pub const COUNT_ALIAS: &str = "total_rows";

/// SQL flavor of a source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// GoogleSQL (backtick-quoted table path)
    BigQuery,
    /// PostgreSQL (double-quoted identifiers, typed projection)
    Postgres,
}

impl Dialect {
    /// Render a table reference
    pub fn table(&self, table: &TableRef) -> String {
        match self {
            Dialect::BigQuery => format!("`{}`", table.as_str()),
            Dialect::Postgres => table
                .segments()
                .map(|s| format!("\"{s}\""))
                .collect::<Vec<_>>()
                .join("."),
        }
    }

    /// Render a column reference
    pub fn column(&self, column: &ColumnName) -> String {
        match self {
            Dialect::BigQuery => column.as_str().to_string(),
            Dialect::Postgres => format!("\"{}\"", column.as_str()),
        }
    }

    fn projection(&self, predicate: &ExportPredicate) -> String {
        let columns = predicate.columns();
        match self {
            Dialect::BigQuery => columns
                .as_array()
                .iter()
                .map(|c| self.column(c))
                .collect::<Vec<_>>()
                .join(", "),
            // Decoded as (text, float8) regardless of the stored types
            Dialect::Postgres => format!(
                "CAST({} AS TEXT), CAST({} AS DOUBLE PRECISION), CAST({} AS DOUBLE PRECISION)",
                self.column(&columns.postal_code),
                self.column(&columns.latitude),
                self.column(&columns.longitude),
            ),
        }
    }

    fn where_clause(&self, predicate: &ExportPredicate) -> String {
        predicate
            .required_columns()
            .iter()
            .map(|c| format!("{} IS NOT NULL", self.column(c)))
            .collect::<Vec<_>>()
            .join(" AND ")
    }
}

/// `SELECT COUNT(*)` over the eligible rows
pub fn count_sql(dialect: Dialect, predicate: &ExportPredicate) -> String {
    format!(
        "SELECT COUNT(*) AS {COUNT_ALIAS} FROM {} WHERE {}",
        dialect.table(predicate.table()),
        dialect.where_clause(predicate)
    )
}

/// Projection of the three exported columns with ordering and pagination
pub fn select_sql(dialect: Dialect, predicate: &ExportPredicate, query: &RowQuery) -> String {
    let mut sql = format!(
        "SELECT {} FROM {} WHERE {}",
        dialect.projection(predicate),
        dialect.table(predicate.table()),
        dialect.where_clause(predicate)
    );

    if query.is_ordered() {
        let order = query
            .order_by
            .iter()
            .map(|c| dialect.column(c))
            .collect::<Vec<_>>()
            .join(", ");
        sql.push_str(&format!(" ORDER BY {order}"));
    }
    if let Some(limit) = query.limit {
        sql.push_str(&format!(" LIMIT {limit}"));
    }
    if query.offset > 0 {
        sql.push_str(&format!(" OFFSET {}", query.offset));
    }

    sql
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ColumnSet;

    fn predicate(table: &str) -> ExportPredicate {
        ExportPredicate::new(
            TableRef::new(table).unwrap(),
            ColumnSet::new(
                ColumnName::new("cep").unwrap(),
                ColumnName::new("latitude").unwrap(),
                ColumnName::new("longitude").unwrap(),
            ),
        )
    }

    #[test]
    fn test_bigquery_count() {
        let p = predicate("basedosdados.br_ibge_censo_2022.cadastro_enderecos");
        assert_eq!(
            count_sql(Dialect::BigQuery, &p),
            "SELECT COUNT(*) AS total_rows \
             FROM `basedosdados.br_ibge_censo_2022.cadastro_enderecos` \
             WHERE cep IS NOT NULL AND latitude IS NOT NULL AND longitude IS NOT NULL"
        );
    }

    #[test]
    fn test_bigquery_page() {
        let p = predicate("ds.addresses");
        let sql = select_sql(Dialect::BigQuery, &p, &RowQuery::page(&p, 100_000, 200_000));
        assert_eq!(
            sql,
            "SELECT cep, latitude, longitude FROM `ds.addresses` \
             WHERE cep IS NOT NULL AND latitude IS NOT NULL AND longitude IS NOT NULL \
             ORDER BY cep, latitude, longitude LIMIT 100000 OFFSET 200000"
        );
    }

    #[test]
    fn test_first_page_has_no_offset_clause() {
        let p = predicate("ds.addresses");
        let sql = select_sql(Dialect::BigQuery, &p, &RowQuery::page(&p, 50, 0));
        assert!(sql.ends_with("LIMIT 50"));
    }

    #[test]
    fn test_unbounded_has_no_order_or_limit() {
        let p = predicate("ds.addresses");
        let sql = select_sql(Dialect::BigQuery, &p, &RowQuery::unbounded());
        assert!(!sql.contains("ORDER BY"));
        assert!(!sql.contains("LIMIT"));
    }

    #[test]
    fn test_postgres_quoting_and_casts() {
        let p = predicate("public.addresses");
        assert_eq!(
            count_sql(Dialect::Postgres, &p),
            "SELECT COUNT(*) AS total_rows FROM \"public\".\"addresses\" \
             WHERE \"cep\" IS NOT NULL AND \"latitude\" IS NOT NULL AND \"longitude\" IS NOT NULL"
        );

        let sql = select_sql(Dialect::Postgres, &p, &RowQuery::preview(5));
        assert!(sql.starts_with(
            "SELECT CAST(\"cep\" AS TEXT), CAST(\"latitude\" AS DOUBLE PRECISION), \
             CAST(\"longitude\" AS DOUBLE PRECISION) FROM \"public\".\"addresses\""
        ));
        assert!(sql.ends_with(" LIMIT 5"));
    }
}

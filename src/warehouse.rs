//! Read-only access to the warehouse's routine metadata view.

use anyhow::{Context, Result};
use postgres::{Client, NoTls};

/// One row of the information-schema procedures view.
#[derive(Debug, Clone)]
pub struct ProcedureRecord {
    pub catalog: String,
    pub schema: String,
    pub name: String,
    pub definition: String,
}

/// Blocking warehouse connection.
pub struct Warehouse {
    client: Client,
}

impl Warehouse {
    pub fn connect(url: &str) -> Result<Self> {
        let client = Client::connect(url, NoTls).context("Failed to connect to the warehouse")?;
        Ok(Self { client })
    }

    /// Fetch routine definitions for one catalog, ordered by name then
    /// argument signature so overloads stay adjacent.
    ///
    /// `schema` restricts the result to a single schema; `None` returns
    /// every schema in the catalog. The filter compares upper-cased, the
    /// way the view stores identifiers.
    pub fn fetch_definitions(
        &mut self,
        catalog: &str,
        schema: Option<&str>,
    ) -> Result<Vec<ProcedureRecord>> {
        // The catalog is an identifier and cannot be bound as a parameter.
        let base = format!(
            "SELECT procedure_catalog, procedure_schema, procedure_name, procedure_definition \
             FROM {catalog}.information_schema.procedures"
        );

        let rows = match schema {
            Some(schema) => {
                let query = format!(
                    "{base} WHERE procedure_schema = $1 \
                     ORDER BY procedure_name, argument_signature"
                );
                let schema = schema.to_uppercase();
                self.client.query(query.as_str(), &[&schema])
            }
            None => {
                let query = format!("{base} ORDER BY procedure_name, argument_signature");
                self.client.query(query.as_str(), &[])
            }
        }
        .with_context(|| format!("Failed to query routine definitions from {catalog}"))?;

        Ok(rows
            .iter()
            .map(|row| ProcedureRecord {
                catalog: row.get::<_, Option<String>>(0).unwrap_or_default(),
                schema: row.get::<_, Option<String>>(1).unwrap_or_default(),
                name: row.get::<_, Option<String>>(2).unwrap_or_default(),
                definition: row.get::<_, Option<String>>(3).unwrap_or_default(),
            })
            .collect())
    }
}

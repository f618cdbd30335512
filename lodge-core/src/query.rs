//! Backend-neutral description of a row query.

/// A related row pulled in alongside each result, joined on `foreign_key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embed {
    pub alias: String,
    pub table: String,
    pub foreign_key: String,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub ascending: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectQuery {
    pub table: String,
    /// Empty means every column.
    pub columns: Vec<String>,
    pub embeds: Vec<Embed>,
    pub order: Option<OrderBy>,
    pub limit: Option<usize>,
}

impl SelectQuery {
    pub fn from(table: &str) -> Self {
        Self {
            table: table.to_string(),
            columns: Vec::new(),
            embeds: Vec::new(),
            order: None,
            limit: None,
        }
    }

    pub fn columns(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn embed(mut self, alias: &str, table: &str, foreign_key: &str, columns: &[&str]) -> Self {
        self.embeds.push(Embed {
            alias: alias.to_string(),
            table: table.to_string(),
            foreign_key: foreign_key.to_string(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
        });
        self
    }

    pub fn order_by(mut self, column: &str, ascending: bool) -> Self {
        self.order = Some(OrderBy { column: column.to_string(), ascending });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Renders the PostgREST `select` parameter, e.g.
    /// `*,customer:customers!customer_id(name)`.
    pub fn select_clause(&self) -> String {
        let mut parts = if self.columns.is_empty() {
            vec!["*".to_string()]
        } else {
            self.columns.clone()
        };

        for embed in &self.embeds {
            let columns = if embed.columns.is_empty() {
                "*".to_string()
            } else {
                embed.columns.join(",")
            };
            parts.push(format!(
                "{}:{}!{}({})",
                embed.alias, embed.table, embed.foreign_key, columns
            ));
        }

        parts.join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_clause_defaults_to_star() {
        assert_eq!(SelectQuery::from("countries").select_clause(), "*");
    }

    #[test]
    fn test_select_clause_with_embeds() {
        let query = SelectQuery::from("bookings")
            .embed("customer", "customers", "customer_id", &["name"])
            .embed("room", "rooms", "room_id", &["room_no"])
            .order_by("created_at", false);

        assert_eq!(
            query.select_clause(),
            "*,customer:customers!customer_id(name),room:rooms!room_id(room_no)"
        );
        assert_eq!(
            query.order,
            Some(OrderBy { column: "created_at".into(), ascending: false })
        );
    }

    #[test]
    fn test_select_clause_with_columns() {
        let query = SelectQuery::from("customers").columns(&["id", "name"]).limit(1);
        assert_eq!(query.select_clause(), "id,name");
        assert_eq!(query.limit, Some(1));
    }
}

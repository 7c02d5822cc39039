//! Filter and sort expressions for listing saved carts.

use crate::models::SnapshotScope;

/// Field holding a snapshot's creation time on the remote store.
pub const CREATED_FIELD: &str = "createdIn";

/// A conjunctive filter plus sort order for one scoped listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotQuery {
    pub filter: String,
    pub sort: String,
}

impl SnapshotQuery {
    /// Builds the query for `scope`.
    ///
    /// Absent lineage is an explicit `is null` predicate so sub-cart
    /// snapshots never show up in a top-level listing. Lineage listings are
    /// oldest first, top-level listings newest first.
    #[must_use]
    pub fn for_scope(scope: &SnapshotScope) -> Self {
        let lineage = match scope.parent_cart_id() {
            Some(parent) => format!("(parentCartId='{parent}')"),
            None => "(parentCartId is null)".to_string(),
        };

        let filter = [
            format!("(organizationId='{}')", scope.organization_id()),
            format!("(costCenterId='{}')", scope.cost_center_id()),
            lineage,
        ]
        .join(" AND ");

        let direction = if scope.parent_cart_id().is_some() {
            "ASC"
        } else {
            "DESC"
        };

        Self {
            filter,
            sort: format!("{CREATED_FIELD} {direction}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_level_query() {
        let scope = SnapshotScope::new("org-1", "cc-7", None).unwrap();
        let query = SnapshotQuery::for_scope(&scope);

        assert_eq!(
            query.filter,
            "(organizationId='org-1') AND (costCenterId='cc-7') AND (parentCartId is null)"
        );
        assert_eq!(query.sort, "createdIn DESC");
    }

    #[test]
    fn lineage_query() {
        let scope = SnapshotScope::new("org-1", "cc-7", Some("quote-3")).unwrap();
        let query = SnapshotQuery::for_scope(&scope);

        assert_eq!(
            query.filter,
            "(organizationId='org-1') AND (costCenterId='cc-7') AND (parentCartId='quote-3')"
        );
        assert_eq!(query.sort, "createdIn ASC");
    }
}

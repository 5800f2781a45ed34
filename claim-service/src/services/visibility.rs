//! Role-scoped visibility over staff records.
//!
//! Which staff rows an admin principal may see is decided by an ordered rule
//! table keyed on the principal's role. The first rule whose role set contains
//! the principal wins; when none does, the principal sees only their own row.
//! Rules are expressed against the ownership of the event being viewed.

use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::{Event, Principal, Role, StaffUser};

/// One conjunction of optional constraints on a staff row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Clause {
    pub roles: Option<Vec<Role>>,
    pub organization_id: Option<i64>,
    pub branch_id: Option<i64>,
    pub user_id: Option<Uuid>,
}

impl Clause {
    fn roles(roles: &[Role]) -> Self {
        Self {
            roles: Some(roles.to_vec()),
            ..Default::default()
        }
    }

    fn in_organization(mut self, organization_id: i64) -> Self {
        self.organization_id = Some(organization_id);
        self
    }

    fn in_branch(mut self, organization_id: i64, branch_id: i64) -> Self {
        self.organization_id = Some(organization_id);
        self.branch_id = Some(branch_id);
        self
    }

    fn matches(&self, user: &StaffUser) -> bool {
        let role_ok = match &self.roles {
            Some(roles) => user.role().is_some_and(|r| roles.contains(&r)),
            None => true,
        };

        role_ok
            && self.organization_id.is_none_or(|o| o == user.organization_id)
            && self.branch_id.is_none_or(|b| b == user.branch_id)
            && self.user_id.is_none_or(|id| id == user.user_id)
    }

    fn push_sql(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        let mut first = true;
        qb.push("(");

        if let Some(roles) = &self.roles {
            conjoin(qb, &mut first);
            qb.push("role_code IN (");
            for (i, role) in roles.iter().enumerate() {
                if i > 0 {
                    qb.push(", ");
                }
                qb.push_bind(role.as_str());
            }
            qb.push(")");
        }
        if let Some(organization_id) = self.organization_id {
            conjoin(qb, &mut first);
            qb.push("organization_id = ").push_bind(organization_id);
        }
        if let Some(branch_id) = self.branch_id {
            conjoin(qb, &mut first);
            qb.push("branch_id = ").push_bind(branch_id);
        }
        if let Some(user_id) = self.user_id {
            conjoin(qb, &mut first);
            qb.push("user_id = ").push_bind(user_id);
        }
        if first {
            qb.push("TRUE");
        }

        qb.push(")");
    }
}

fn conjoin(qb: &mut QueryBuilder<'_, Postgres>, first: &mut bool) {
    if !*first {
        qb.push(" AND ");
    }
    *first = false;
}

/// Disjunction of clauses: a row is visible when any clause matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityFilter {
    clauses: Vec<Clause>,
}

impl VisibilityFilter {
    /// Only the principal's own row.
    pub fn self_only(user_id: Uuid) -> Self {
        Self {
            clauses: vec![Clause {
                user_id: Some(user_id),
                ..Default::default()
            }],
        }
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Evaluate against an in-memory row. Soft-deleted rows never match.
    pub fn matches(&self, user: &StaffUser) -> bool {
        !user.deleted && self.clauses.iter().any(|c| c.matches(user))
    }

    /// Append `deleted = FALSE AND (<clause> OR ...)` to a query.
    pub fn push_sql(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        qb.push("deleted = FALSE AND (");
        if self.clauses.is_empty() {
            qb.push("FALSE");
        }
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                qb.push(" OR ");
            }
            clause.push_sql(qb);
        }
        qb.push(")");
    }
}

/// Ownership of the event the principal is looking at.
#[derive(Debug, Clone, Copy)]
struct EventScope {
    organization_id: i64,
    branch_id: i64,
}

struct VisibilityRule {
    roles: &'static [Role],
    clauses: fn(EventScope) -> Vec<Clause>,
}

const RULES: &[VisibilityRule] = &[
    VisibilityRule {
        roles: &[Role::Root, Role::CoopRoot],
        clauses: root_scope,
    },
    VisibilityRule {
        roles: &[Role::Admin],
        clauses: admin_scope,
    },
];

/// Own branch, every root, and the coop roots of the same organization.
fn root_scope(scope: EventScope) -> Vec<Clause> {
    vec![
        Clause::default().in_branch(scope.organization_id, scope.branch_id),
        Clause::roles(&[Role::Root]),
        Clause::roles(&[Role::CoopRoot]).in_organization(scope.organization_id),
    ]
}

/// Every root and coop root, plus admins and staff of the same branch.
fn admin_scope(scope: EventScope) -> Vec<Clause> {
    vec![
        Clause::roles(&[Role::Root]),
        Clause::roles(&[Role::CoopRoot]),
        Clause::roles(&[Role::Admin, Role::Staff])
            .in_branch(scope.organization_id, scope.branch_id),
    ]
}

/// Build the visibility predicate for `principal` viewing staff of `event`.
pub fn resolve_visibility_filter(principal: &Principal, event: &Event) -> VisibilityFilter {
    let scope = EventScope {
        organization_id: event.organization_id,
        branch_id: event.branch_id,
    };

    RULES
        .iter()
        .find(|rule| rule.roles.contains(&principal.role))
        .map(|rule| VisibilityFilter {
            clauses: (rule.clauses)(scope),
        })
        .unwrap_or_else(|| VisibilityFilter::self_only(principal.user_id))
}

//! Creator affiliation resolution.
//!
//! Checks, in order, whether a creator is an agent or a developer. The first
//! match wins; a creator matching nothing is an independent user. Lookup
//! failures count as "no match" so registration never fails on them.

use explore_common::AppResult;
use explore_db::entities::explore_content::CreatorType;
use explore_db::repositories::AffiliationRepository;
use tracing::warn;

/// Creator type and agency attached to content at registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Affiliation {
    pub creator_type: CreatorType,
    /// Only set for agents working for an agency.
    pub agency_id: Option<String>,
}

impl Affiliation {
    /// A creator with no professional profile.
    #[must_use]
    pub const fn independent() -> Self {
        Self {
            creator_type: CreatorType::User,
            agency_id: None,
        }
    }
}

/// Service resolving creator affiliations.
#[derive(Clone)]
pub struct AffiliationResolver {
    affiliation_repo: AffiliationRepository,
}

impl AffiliationResolver {
    /// Create a new affiliation resolver.
    #[must_use]
    pub const fn new(affiliation_repo: AffiliationRepository) -> Self {
        Self { affiliation_repo }
    }

    /// Resolve a creator's affiliation. Never fails.
    pub async fn resolve(&self, creator_id: &str) -> Affiliation {
        let agent = self.affiliation_repo.find_agent_by_user(creator_id).await;
        if let Some(found) = matched(creator_id, "agent", agent, |agent| Affiliation {
            creator_type: CreatorType::Agent,
            agency_id: agent.agency_id,
        }) {
            return found;
        }

        let developer = self.affiliation_repo.find_developer_by_user(creator_id).await;
        if let Some(found) = matched(creator_id, "developer", developer, |_| Affiliation {
            creator_type: CreatorType::Developer,
            agency_id: None,
        }) {
            return found;
        }

        Affiliation::independent()
    }
}

fn matched<T>(
    creator_id: &str,
    kind: &str,
    lookup: AppResult<Option<T>>,
    into: impl FnOnce(T) -> Affiliation,
) -> Option<Affiliation> {
    match lookup {
        Ok(found) => found.map(into),
        Err(e) => {
            warn!(creator_id = %creator_id, kind, error = %e, "Affiliation lookup failed");
            None
        }
    }
}

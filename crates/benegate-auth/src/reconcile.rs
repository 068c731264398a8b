//! Token-to-grant reconciliation and census counts.
//!
//! The system-of-record invariant: every distinct
//! (application, beneficiary) pair with at least one currently-valid
//! access token has exactly one grant. Grant creation normally happens
//! synchronously at approval time, but historical data, bulk imports, and
//! out-of-band token creation can leave grants missing. The reconciler is
//! the self-healing backstop, run on demand or from an external
//! scheduler.
//!
//! The census helpers at the bottom feed ops dashboards; they classify
//! beneficiaries as real or synthetic via the crosswalk `fhir_id`
//! convention.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::AuthResult;
use crate::storage::{CrosswalkStorage, GrantStorage, TokenStorage};
use crate::types::Crosswalk;

// =============================================================================
// Check Report
// =============================================================================

/// Result of comparing the live token set against the grant set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrantCheckReport {
    /// Distinct (application, beneficiary) pairs among non-expired tokens.
    pub unique_tokens: usize,

    /// Total grants.
    pub grants: usize,
}

impl GrantCheckReport {
    /// Returns `true` when tokens and grants agree.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.unique_tokens == self.grants
    }

    /// Number of token pairs lacking a grant.
    ///
    /// Expected transiently after out-of-band token creation, until
    /// [`GrantReconciler::update`] runs.
    #[must_use]
    pub fn missing_grants(&self) -> usize {
        self.unique_tokens.saturating_sub(self.grants)
    }

    /// Number of grants with no live token pair.
    ///
    /// Reported but never auto-corrected; a grant outlives its tokens
    /// until explicitly revoked.
    #[must_use]
    pub fn orphaned_grants(&self) -> usize {
        self.grants.saturating_sub(self.unique_tokens)
    }
}

// =============================================================================
// Reconciler
// =============================================================================

/// Detects and repairs drift between the token store and the grant store.
pub struct GrantReconciler {
    tokens: Arc<dyn TokenStorage>,
    grants: Arc<dyn GrantStorage>,
}

impl GrantReconciler {
    /// Creates a new reconciler over the two stores.
    pub fn new(tokens: Arc<dyn TokenStorage>, grants: Arc<dyn GrantStorage>) -> Self {
        Self { tokens, grants }
    }

    /// Counts distinct valid-token pairs and grants.
    ///
    /// Read-only diagnostic. The two reads are not a transaction; under
    /// live traffic the report is a close approximation, which is all a
    /// drift check needs. Orphaned grants are logged at WARN.
    ///
    /// # Errors
    ///
    /// Propagates storage failures.
    pub async fn check(&self, now: OffsetDateTime) -> AuthResult<GrantCheckReport> {
        let pairs = self.valid_token_pairs(now).await?;
        let grants = self.grants.count_grants().await?;

        let report = GrantCheckReport {
            unique_tokens: pairs.len(),
            grants,
        };

        if report.orphaned_grants() > 0 {
            tracing::warn!(
                orphaned = report.orphaned_grants(),
                unique_tokens = report.unique_tokens,
                grants = report.grants,
                "Grants outnumber live token pairs"
            );
        }

        Ok(report)
    }

    /// Creates a grant for every valid-token pair that lacks one.
    ///
    /// Idempotent: pairs already granted are left untouched, and a
    /// concurrent creation racing the reconciler (surfacing as
    /// `DuplicateGrant`) is absorbed as already handled. A scheduled run
    /// never fails because the system self-healed concurrently.
    ///
    /// # Returns
    ///
    /// The number of grants created.
    ///
    /// # Errors
    ///
    /// Propagates storage failures other than the absorbed duplicate.
    pub async fn update(&self, now: OffsetDateTime) -> AuthResult<usize> {
        let pairs = self.valid_token_pairs(now).await?;
        let mut created = 0;

        for (application_id, beneficiary_id) in pairs {
            match self
                .grants
                .upsert_grant(application_id, beneficiary_id, now)
                .await
            {
                Ok((_, true)) => {
                    created += 1;
                    tracing::debug!(
                        application_id = %application_id,
                        beneficiary_id = %beneficiary_id,
                        "Created missing grant"
                    );
                }
                Ok((_, false)) => {}
                Err(err) if err.is_duplicate_grant() => {
                    tracing::warn!(
                        application_id = %application_id,
                        beneficiary_id = %beneficiary_id,
                        "Absorbed concurrent grant creation during reconciliation"
                    );
                }
                Err(err) => return Err(err),
            }
        }

        if created > 0 {
            tracing::info!(created, "Reconciliation created missing grants");
        }

        Ok(created)
    }

    async fn valid_token_pairs(&self, now: OffsetDateTime) -> AuthResult<HashSet<(Uuid, Uuid)>> {
        let tokens = self.tokens.list_tokens().await?;
        Ok(tokens
            .iter()
            .filter(|token| token.is_valid(now))
            .map(|token| token.pair())
            .collect())
    }
}

// =============================================================================
// Census Counts
// =============================================================================

/// Grant census for ops dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrantCounts {
    /// Total grants.
    pub total: usize,

    /// Total archive rows.
    pub archived_total: usize,

    /// Distinct real beneficiaries holding at least one grant.
    pub real_deduped: usize,

    /// Distinct synthetic beneficiaries holding at least one grant.
    pub synthetic_deduped: usize,
}

/// Token census for ops dashboards.
///
/// The pair counts should match the grant totals when the stores are
/// consistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenCounts {
    /// Total live tokens, expired ones included.
    pub total: usize,

    /// Total archived tokens.
    pub archived_total: usize,

    /// Distinct real beneficiaries holding at least one live token.
    pub real_deduped: usize,

    /// Distinct synthetic beneficiaries holding at least one live token.
    pub synthetic_deduped: usize,

    /// Distinct (application, beneficiary) pairs for real beneficiaries.
    pub real_pair_deduped: usize,

    /// Distinct (application, beneficiary) pairs for synthetic
    /// beneficiaries.
    pub synthetic_pair_deduped: usize,
}

/// Counts grants by real and synthetic beneficiary.
///
/// Beneficiaries with no crosswalk or an empty `fhir_id` count toward
/// neither bucket.
///
/// # Errors
///
/// Propagates storage failures.
pub async fn grant_counts(
    grants: &dyn GrantStorage,
    crosswalks: &dyn CrosswalkStorage,
) -> AuthResult<GrantCounts> {
    let all = grants.list_grants().await?;
    let by_user = crosswalks_by_user(crosswalks).await?;

    let mut real = HashSet::new();
    let mut synthetic = HashSet::new();
    for grant in &all {
        match by_user.get(&grant.beneficiary_id) {
            Some(crosswalk) if crosswalk.is_real() => {
                real.insert(grant.beneficiary_id);
            }
            Some(crosswalk) if crosswalk.is_synthetic() => {
                synthetic.insert(grant.beneficiary_id);
            }
            _ => {}
        }
    }

    Ok(GrantCounts {
        total: all.len(),
        archived_total: grants.count_archived().await?,
        real_deduped: real.len(),
        synthetic_deduped: synthetic.len(),
    })
}

/// Counts live tokens by real and synthetic beneficiary.
///
/// Counts cover the whole token table regardless of expiry, matching the
/// grant census it is compared against.
///
/// # Errors
///
/// Propagates storage failures.
pub async fn token_counts(
    tokens: &dyn TokenStorage,
    crosswalks: &dyn CrosswalkStorage,
) -> AuthResult<TokenCounts> {
    let all = tokens.list_tokens().await?;
    let by_user = crosswalks_by_user(crosswalks).await?;

    let mut real = HashSet::new();
    let mut synthetic = HashSet::new();
    let mut real_pairs = HashSet::new();
    let mut synthetic_pairs = HashSet::new();
    for token in &all {
        match by_user.get(&token.beneficiary_id) {
            Some(crosswalk) if crosswalk.is_real() => {
                real.insert(token.beneficiary_id);
                real_pairs.insert(token.pair());
            }
            Some(crosswalk) if crosswalk.is_synthetic() => {
                synthetic.insert(token.beneficiary_id);
                synthetic_pairs.insert(token.pair());
            }
            _ => {}
        }
    }

    Ok(TokenCounts {
        total: all.len(),
        archived_total: tokens.count_archived_tokens().await?,
        real_deduped: real.len(),
        synthetic_deduped: synthetic.len(),
        real_pair_deduped: real_pairs.len(),
        synthetic_pair_deduped: synthetic_pairs.len(),
    })
}

async fn crosswalks_by_user(
    crosswalks: &dyn CrosswalkStorage,
) -> AuthResult<HashMap<Uuid, Crosswalk>> {
    let list = crosswalks.list_crosswalks().await?;
    Ok(list
        .into_iter()
        .map(|crosswalk| (crosswalk.user_id, crosswalk))
        .collect())
}

/// Coarse classification of a failed claim transaction. Raw provider errors
/// are logged for diagnostics but never shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MintFailure {
    UserRejected,
    Network,
    Reverted,
    Unknown,
}

impl MintFailure {
    pub fn user_message(&self) -> &'static str {
        match self {
            MintFailure::UserRejected => "Transaction cancelled.",
            MintFailure::Network => "Network error. Please try again.",
            MintFailure::Reverted => "Transaction failed. Please try again.",
            MintFailure::Unknown => "Transaction failed. Please try again.",
        }
    }
}

/// Lifecycle of the claim transaction. `Submitting` doubles as the
/// in-flight guard: a second trigger while submitting is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MintStatus {
    Idle,
    Submitting,
    Success,
    Failed(MintFailure),
}

impl MintStatus {
    pub fn is_submitting(&self) -> bool {
        matches!(self, MintStatus::Submitting)
    }
}

/// Why a trigger was rejected before any transaction was prepared.
/// Checked in order; each produces distinct user-facing copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MintRejection {
    CooldownActive,
    NotEligible,
    NoAccount,
}

impl MintRejection {
    pub fn user_message(&self) -> &'static str {
        match self {
            MintRejection::CooldownActive => "Please wait before trying again",
            MintRejection::NotEligible => "Access denied - unauthorized wallet",
            MintRejection::NoAccount => "Please ensure your wallet is connected",
        }
    }
}

/// Anti-spam gate over the single in-flight claim transaction.
/// Session-local memory only; nothing is persisted.
#[derive(Debug, Clone, Copy)]
pub struct MintGate {
    last_attempt_ms: f64,
    cooldown_ms: f64,
}

impl MintGate {
    pub fn new(cooldown_ms: f64) -> Self {
        Self {
            last_attempt_ms: 0.0,
            cooldown_ms,
        }
    }

    /// Whether the cooldown window is still open at `now_ms`.
    pub fn is_cooling_down(&self, now_ms: f64) -> bool {
        self.last_attempt_ms > 0.0 && now_ms - self.last_attempt_ms < self.cooldown_ms
    }

    /// Record an attempt, starting the cooldown window.
    pub fn record_attempt(&mut self, now_ms: f64) {
        self.last_attempt_ms = now_ms;
    }
}

/// Check the claim preconditions in order: cooldown, eligibility, account.
/// Returns `Ok(())` when the write transaction may be submitted.
pub fn check_preconditions(
    gate: &MintGate,
    now_ms: f64,
    is_eligible: bool,
    has_account: bool,
) -> Result<(), MintRejection> {
    if gate.is_cooling_down(now_ms) {
        return Err(MintRejection::CooldownActive);
    }
    if !is_eligible {
        return Err(MintRejection::NotEligible);
    }
    if !has_account {
        return Err(MintRejection::NoAccount);
    }
    Ok(())
}

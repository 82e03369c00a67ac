/// Latest observed values of the six read-only contract queries.
///
/// Each field resolves independently; `None` means "not yet resolved or the
/// read failed". The six reads carry no atomicity guarantee, they may
/// reflect slightly different block heights.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ContractSnapshot {
    pub has_claimed: Option<bool>,
    pub total_supply: Option<u64>,
    pub max_supply: Option<u64>,
    pub drawing_deadline: Option<u64>,
    pub minting_active: Option<bool>,
    pub paused: Option<bool>,
}

impl ContractSnapshot {
    /// Supply progress in whole percent, when both ends are known.
    pub fn supply_percentage(&self) -> Option<u64> {
        match (self.total_supply, self.max_supply) {
            (Some(total), Some(max)) if max > 0 => Some((total * 100 + max / 2) / max),
            _ => None,
        }
    }
}

/// The single, mutually exclusive reason the claim section currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EligibilityVerdict {
    /// No authorized session
    Unauthorized,
    /// A field needed to settle the verdict is still unknown
    Pending,
    /// Contract owner paused claiming
    Paused,
    /// The drawing deadline has passed (minting no longer active)
    DrawingEnded,
    /// Every token has been claimed
    SupplyExhausted,
    /// This address already holds its token
    AlreadyClaimed,
    Eligible,
}

/// Derive the eligibility verdict from the snapshot and the authorization
/// state, top-down by precedence:
///
/// `Unauthorized > Paused > DrawingEnded > SupplyExhausted > AlreadyClaimed
/// > Eligible`
///
/// An unknown field defers the verdict (`Pending`) instead of defaulting
/// optimistically: a read error must never unlock the claim button.
pub fn derive_verdict(snapshot: &ContractSnapshot, is_authorized: bool) -> EligibilityVerdict {
    if !is_authorized {
        return EligibilityVerdict::Unauthorized;
    }

    match snapshot.paused {
        None => return EligibilityVerdict::Pending,
        Some(true) => return EligibilityVerdict::Paused,
        Some(false) => {}
    }

    match snapshot.minting_active {
        None => return EligibilityVerdict::Pending,
        Some(false) => return EligibilityVerdict::DrawingEnded,
        Some(true) => {}
    }

    match (snapshot.total_supply, snapshot.max_supply) {
        (Some(total), Some(max)) if total >= max => return EligibilityVerdict::SupplyExhausted,
        (Some(_), Some(_)) => {}
        _ => return EligibilityVerdict::Pending,
    }

    match snapshot.has_claimed {
        None => EligibilityVerdict::Pending,
        Some(true) => EligibilityVerdict::AlreadyClaimed,
        Some(false) => EligibilityVerdict::Eligible,
    }
}

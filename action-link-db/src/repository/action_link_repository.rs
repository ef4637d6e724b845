use crate::models::action_link::ActionLinkModel;
use crate::repository::{
    ConsumeUse, Create, FindByTokenHash, Load, LoadAudits, RecordVerification, Revoke,
};

/// Everything the action link service needs from link storage
pub trait ActionLinkRepository:
    Create<ActionLinkModel>
    + Load<ActionLinkModel>
    + FindByTokenHash
    + RecordVerification
    + ConsumeUse
    + Revoke
    + LoadAudits
{
}

impl<T> ActionLinkRepository for T where
    T: Create<ActionLinkModel>
        + Load<ActionLinkModel>
        + FindByTokenHash
        + RecordVerification
        + ConsumeUse
        + Revoke
        + LoadAudits
{
}

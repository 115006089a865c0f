use crate::model::{AmountOverflow, BillMember, ItemSplit, MemberId, Money};
use fxhash::FxHashSet;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SplitValidationError {
    #[error("members not in this bill: {}", join_ids(.0))]
    ForeignMembers(Vec<MemberId>),
    #[error("member {0} appears more than once in the split set")]
    DuplicateMember(MemberId),
    #[error("weight for member {0} must not be negative")]
    NegativeWeight(MemberId),
    #[error("fixed amount for member {0} must not be negative")]
    NegativeFixedAmount(MemberId),
    #[error("fixed amounts ({fixed}) exceed the item total ({total})")]
    FixedAmountsExceedTotal { fixed: Money, total: Money },
    #[error("fixed amounts are too large to add up")]
    FixedAmountsOverflow(#[from] AmountOverflow),
}

fn join_ids(ids: &[MemberId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Checks a split set against the members of the bill it is meant for.
pub struct SplitValidator {
    members: FxHashSet<MemberId>,
}

impl SplitValidator {
    pub fn new<'a, I>(members: I) -> Self
    where
        I: IntoIterator<Item = &'a BillMember>,
    {
        Self {
            members: members.into_iter().map(|m| m.id).collect(),
        }
    }

    pub fn contains(&self, member_id: MemberId) -> bool {
        self.members.contains(&member_id)
    }

    /// Rejects the whole set when any split is invalid; nothing is filtered out.
    pub fn validate(
        &self,
        item_total: Money,
        splits: &[ItemSplit],
    ) -> Result<(), SplitValidationError> {
        let foreign: Vec<MemberId> = splits
            .iter()
            .map(|split| split.member_id)
            .filter(|id| !self.members.contains(id))
            .collect();
        if !foreign.is_empty() {
            return Err(SplitValidationError::ForeignMembers(foreign));
        }

        let mut seen = FxHashSet::default();
        let mut fixed = Money::ZERO;
        for split in splits {
            if !seen.insert(split.member_id) {
                return Err(SplitValidationError::DuplicateMember(split.member_id));
            }
            if split.weight.is_negative() {
                return Err(SplitValidationError::NegativeWeight(split.member_id));
            }
            if let Some(amount) = split.fixed_amount {
                if amount.is_negative() {
                    return Err(SplitValidationError::NegativeFixedAmount(split.member_id));
                }
                fixed = fixed.checked_add(amount)?;
            }
        }

        if fixed > item_total {
            return Err(SplitValidationError::FixedAmountsExceedTotal {
                fixed,
                total: item_total,
            });
        }

        Ok(())
    }
}

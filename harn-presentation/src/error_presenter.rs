use harn_application::{BillError, InvalidInput, Resource, Role};
use harn_domain::MemberId;
use harn_i18n as i18n;

pub fn format_bill_error(error: &BillError) -> String {
    match error {
        BillError::NotFound(resource) => i18n::not_found(resource_label(*resource)),
        BillError::Forbidden { required } => i18n::forbidden(role_label(*required)),
        BillError::InvalidReference(ids) => i18n::foreign_members(join_ids(ids)),
        BillError::InvalidInput(input) => format_invalid_input(input),
        BillError::JoinCodeExhausted { .. } => i18n::JOIN_CODE_EXHAUSTED.to_string(),
        BillError::Settlement(err) => format!("{}: {err}", i18n::SETTLEMENT_FAILED),
        BillError::Repository(err) => format!("{}: {err}", i18n::STORAGE_FAILED),
    }
}

fn format_invalid_input(input: &InvalidInput) -> String {
    format!("{}: {input}", i18n::INVALID_INPUT)
}

fn resource_label(resource: Resource) -> &'static str {
    match resource {
        Resource::Bill => i18n::RESOURCE_BILL,
        Resource::Member => i18n::RESOURCE_MEMBER,
        Resource::Item => i18n::RESOURCE_ITEM,
        Resource::BankAccount => i18n::RESOURCE_BANK_ACCOUNT,
    }
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::Owner => i18n::ROLE_OWNER,
        Role::Participant => i18n::ROLE_PARTICIPANT,
        Role::Payer => i18n::ROLE_PAYER,
        Role::AccountHolder => i18n::ROLE_ACCOUNT_HOLDER,
    }
}

fn join_ids(ids: &[MemberId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

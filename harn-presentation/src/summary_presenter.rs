use crate::text_table::{Alignment, TextTableBuilder};
use harn_application::BillSummary;
use harn_domain::{BillStatus, IntegrityWarning, ItemId, SettlementContext};
use harn_i18n as i18n;
use std::{borrow::Cow, fmt::Write};

pub struct SummaryPresenter;

impl SummaryPresenter {
    /// Per-member totals, the grand total, payment details and any warnings.
    pub fn render(summary: &BillSummary) -> String {
        let scale = SettlementContext::for_currency(&summary.currency).scale;
        let settlement = &summary.settlement;

        let mut out = String::new();
        let _ = writeln!(out, "{} [{}]", settlement.title, summary.currency);
        let _ = writeln!(out, "{}: {}", i18n::STATUS, status_label(summary.status));
        out.push('\n');
        out.push_str(&Self::build_member_table(summary, scale));
        let _ = writeln!(
            out,
            "{}: {}",
            i18n::GRAND_TOTAL,
            settlement.grand_total.to_fixed(scale)
        );

        if let Some(payment) = &summary.payment {
            out.push('\n');
            let _ = writeln!(out, "{}:", i18n::PAY_TO);
            if let (Some(bank), Some(account)) = (&payment.bank_name, &payment.bank_account) {
                let _ = writeln!(out, "  {bank} {account}");
            }
            if let Some(number) = &payment.prompt_pay_number {
                let name = payment.prompt_pay_name.as_deref().unwrap_or_default();
                let _ = writeln!(out, "  {} {number} {name}", i18n::PROMPT_PAY);
            }
        }

        if !settlement.warnings.is_empty() {
            out.push('\n');
            let _ = writeln!(out, "{}:", i18n::WARNINGS);
            for warning in &settlement.warnings {
                let _ = writeln!(out, "  - {}", warning_text(summary, warning, scale));
            }
        }

        out
    }

    pub fn build_member_table(summary: &BillSummary, scale: u32) -> String {
        let headers = [
            Cow::Borrowed(i18n::MEMBER),
            Cow::Borrowed(i18n::BASE),
            Cow::Borrowed(i18n::SERVICE_CHARGE),
            Cow::Borrowed(i18n::VAT),
            Cow::Borrowed(i18n::NET),
            Cow::Borrowed(i18n::PAID),
        ];
        TextTableBuilder::new()
            .alignments(&[
                Alignment::Left,
                Alignment::Right,
                Alignment::Right,
                Alignment::Right,
                Alignment::Right,
                Alignment::Center,
            ])
            .headers(&headers)
            .rows(summary.settlement.members.iter().map(|member| {
                [
                    Cow::Borrowed(member.name.as_str()),
                    Cow::Owned(member.base_amount.to_fixed(scale)),
                    Cow::Owned(member.sc_amount.to_fixed(scale)),
                    Cow::Owned(member.vat_amount.to_fixed(scale)),
                    Cow::Owned(member.net_amount.to_fixed(scale)),
                    Cow::Borrowed(if member.is_paid {
                        i18n::PAID
                    } else {
                        i18n::UNPAID
                    }),
                ]
            }))
            .build()
    }

    /// Every item share of every member, in settlement order.
    pub fn render_breakdown(summary: &BillSummary) -> String {
        let scale = SettlementContext::for_currency(&summary.currency).scale;
        let headers = [
            Cow::Borrowed(i18n::MEMBER),
            Cow::Borrowed(i18n::ITEM),
            Cow::Borrowed(i18n::AMOUNT),
        ];
        TextTableBuilder::new()
            .alignments(&[Alignment::Left, Alignment::Left, Alignment::Right])
            .headers(&headers)
            .rows(summary.settlement.members.iter().flat_map(|member| {
                member.items.iter().map(move |share| {
                    [
                        Cow::Borrowed(member.name.as_str()),
                        Cow::Borrowed(share.name.as_str()),
                        Cow::Owned(share.amount.to_fixed(scale)),
                    ]
                })
            }))
            .build()
    }
}

pub(crate) fn status_label(status: BillStatus) -> &'static str {
    match status {
        BillStatus::Draft => i18n::STATUS_DRAFT,
        BillStatus::Completed => i18n::STATUS_COMPLETED,
        BillStatus::Cancelled => i18n::STATUS_CANCELLED,
    }
}

fn warning_text(summary: &BillSummary, warning: &IntegrityWarning, scale: u32) -> String {
    match warning {
        IntegrityWarning::OwnerMemberMissing { item_id, amount } => {
            i18n::owner_member_missing(item_label(summary, *item_id), amount.to_fixed(scale))
        }
        IntegrityWarning::FixedAmountsExceedTotal { item_id, excess } => {
            i18n::fixed_amounts_exceed(item_label(summary, *item_id), excess.to_fixed(scale))
        }
    }
}

/// Item name when some member carries a share of it, otherwise its id.
fn item_label(summary: &BillSummary, item_id: ItemId) -> String {
    summary
        .settlement
        .members
        .iter()
        .flat_map(|m| m.items.iter())
        .find(|share| share.item_id == item_id)
        .map(|share| share.name.clone())
        .unwrap_or_else(|| item_id.to_string())
}

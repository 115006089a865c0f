use crate::{
    summary_presenter::status_label,
    text_table::{Alignment, TextTableBuilder},
};
use harn_application::{BillAggregate, BillOverview, SplitView};
use harn_domain::{BankAccount, BillMember, FeeConfig, Percent, SettlementContext};
use harn_i18n as i18n;
use std::{borrow::Cow, fmt::Write};

/// Plain-text tables for everything except the settlement summary.
pub struct ListingPresenter;

impl ListingPresenter {
    pub fn render_bills(bills: &[BillOverview]) -> String {
        let headers = [
            Cow::Borrowed(i18n::ID),
            Cow::Borrowed(i18n::TITLE),
            Cow::Borrowed(i18n::JOIN_CODE),
            Cow::Borrowed(i18n::STATUS),
            Cow::Borrowed(i18n::MEMBER_COUNT),
            Cow::Borrowed(i18n::ITEM_COUNT),
        ];
        TextTableBuilder::new()
            .alignments(&[
                Alignment::Left,
                Alignment::Left,
                Alignment::Left,
                Alignment::Left,
                Alignment::Right,
                Alignment::Right,
            ])
            .headers(&headers)
            .rows(bills.iter().map(|overview| {
                [
                    Cow::Owned(overview.bill.id.to_string()),
                    Cow::Borrowed(overview.bill.title.as_str()),
                    Cow::Borrowed(overview.bill.join_code.as_str()),
                    Cow::Borrowed(status_label(overview.bill.status)),
                    Cow::Owned(overview.member_count.to_string()),
                    Cow::Owned(overview.item_count.to_string()),
                ]
            }))
            .build()
    }

    /// Bill header, fee settings, members and items.
    pub fn render_bill(aggregate: &BillAggregate) -> String {
        let bill = &aggregate.bill;
        let scale = SettlementContext::for_currency(&bill.currency).scale;

        let mut out = String::new();
        let _ = writeln!(out, "{} [{}]", bill.title, bill.currency);
        let _ = writeln!(out, "{}: {}", i18n::ID, bill.id);
        let _ = writeln!(out, "{}: {}", i18n::JOIN_CODE, bill.join_code);
        let _ = writeln!(out, "{}: {}", i18n::STATUS, status_label(bill.status));
        if let Some(note) = &bill.note {
            let _ = writeln!(out, "{}: {note}", i18n::NOTE);
        }
        let _ = writeln!(out, "{}", fee_line(&bill.fees));
        out.push('\n');
        out.push_str(&Self::render_members(&aggregate.members));
        out.push('\n');

        let headers = [
            Cow::Borrowed(i18n::ID),
            Cow::Borrowed(i18n::ITEM),
            Cow::Borrowed(i18n::PRICE),
            Cow::Borrowed(i18n::QUANTITY),
            Cow::Borrowed(i18n::TOTAL),
        ];
        out.push_str(
            &TextTableBuilder::new()
                .alignments(&[
                    Alignment::Left,
                    Alignment::Left,
                    Alignment::Right,
                    Alignment::Right,
                    Alignment::Right,
                ])
                .headers(&headers)
                .rows(aggregate.items.iter().map(|item| {
                    [
                        Cow::Owned(item.id.to_string()),
                        Cow::Borrowed(item.name.as_str()),
                        Cow::Owned(item.price().to_fixed(scale)),
                        Cow::Owned(item.quantity().to_string()),
                        Cow::Owned(item.total_price().to_fixed(scale)),
                    ]
                }))
                .build(),
        );
        out
    }

    pub fn render_members(members: &[BillMember]) -> String {
        let headers = [
            Cow::Borrowed(i18n::ID),
            Cow::Borrowed(i18n::NAME),
            Cow::Borrowed(i18n::PAID),
        ];
        TextTableBuilder::new()
            .alignments(&[Alignment::Left, Alignment::Left, Alignment::Center])
            .headers(&headers)
            .rows(members.iter().map(|member| {
                let name = if member.is_guest() {
                    Cow::Owned(format!("{} ({})", member.name, i18n::GUEST))
                } else {
                    Cow::Borrowed(member.name.as_str())
                };
                [
                    Cow::Owned(member.id.to_string()),
                    name,
                    Cow::Borrowed(if member.is_paid {
                        i18n::PAID
                    } else {
                        i18n::UNPAID
                    }),
                ]
            }))
            .build()
    }

    pub fn render_splits(splits: &[SplitView], scale: u32) -> String {
        let headers = [
            Cow::Borrowed(i18n::ID),
            Cow::Borrowed(i18n::MEMBER),
            Cow::Borrowed(i18n::WEIGHT),
            Cow::Borrowed(i18n::FIXED_AMOUNT),
        ];
        TextTableBuilder::new()
            .alignments(&[
                Alignment::Left,
                Alignment::Left,
                Alignment::Right,
                Alignment::Right,
            ])
            .headers(&headers)
            .rows(splits.iter().map(|split| {
                [
                    Cow::Owned(split.member_id.to_string()),
                    Cow::Borrowed(split.member_name.as_str()),
                    Cow::Owned(split.weight.to_string()),
                    split
                        .fixed_amount
                        .map_or(Cow::Borrowed("-"), |amount| Cow::Owned(amount.to_fixed(scale))),
                ]
            }))
            .build()
    }

    pub fn render_bank_accounts(accounts: &[BankAccount]) -> String {
        let headers = [
            Cow::Borrowed(i18n::ID),
            Cow::Borrowed(i18n::BANK),
            Cow::Borrowed(i18n::ACCOUNT_NUMBER),
            Cow::Borrowed(i18n::ACCOUNT_NAME),
            Cow::Borrowed(i18n::DEFAULT_ACCOUNT),
        ];
        TextTableBuilder::new()
            .alignments(&[
                Alignment::Left,
                Alignment::Left,
                Alignment::Left,
                Alignment::Left,
                Alignment::Center,
            ])
            .headers(&headers)
            .rows(accounts.iter().map(|account| {
                [
                    Cow::Owned(account.id.to_string()),
                    Cow::Borrowed(account.bank_name.as_str()),
                    Cow::Borrowed(account.account_number.as_str()),
                    Cow::Borrowed(account.account_name.as_str()),
                    Cow::Borrowed(if account.is_default { "*" } else { "" }),
                ]
            }))
            .build()
    }
}

fn fee_line(fees: &FeeConfig) -> String {
    format!(
        "{}  {}",
        rate_label(i18n::SERVICE_CHARGE, fees.service_charge_rate, fees.service_charge_included),
        rate_label(i18n::VAT, fees.vat_rate, fees.vat_included),
    )
}

fn rate_label(label: &str, rate: Percent, included: bool) -> String {
    if included {
        format!("{label} {rate}% ({})", i18n::INCLUDED)
    } else {
        format!("{label} {rate}%")
    }
}

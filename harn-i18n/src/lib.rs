#[cfg(all(feature = "th", feature = "en"))]
compile_error!("Cannot enable both 'th' and 'en' features at the same time");

#[cfg(feature = "th")]
pub mod strings {
    pub const MEMBER: &str = "สมาชิก";
    pub const BASE: &str = "ค่าอาหาร";
    pub const SERVICE_CHARGE: &str = "ค่าบริการ";
    pub const VAT: &str = "VAT";
    pub const NET: &str = "ยอดสุทธิ";
    pub const PAID: &str = "จ่ายแล้ว";
    pub const UNPAID: &str = "ยังไม่จ่าย";
    pub const ITEM: &str = "รายการ";
    pub const AMOUNT: &str = "จำนวนเงิน";
    pub const GRAND_TOTAL: &str = "ยอดรวมทั้งหมด";
    pub const STATUS: &str = "สถานะ";
    pub const STATUS_DRAFT: &str = "กำลังแก้ไข";
    pub const STATUS_COMPLETED: &str = "ปิดบิลแล้ว";
    pub const STATUS_CANCELLED: &str = "ยกเลิกแล้ว";
    pub const PAY_TO: &str = "โอนเงินไปที่";
    pub const PROMPT_PAY: &str = "พร้อมเพย์";
    pub const WARNINGS: &str = "คำเตือน";
    pub const RESOURCE_BILL: &str = "บิล";
    pub const RESOURCE_MEMBER: &str = "สมาชิก";
    pub const RESOURCE_ITEM: &str = "รายการ";
    pub const RESOURCE_BANK_ACCOUNT: &str = "บัญชีธนาคาร";
    pub const ROLE_OWNER: &str = "เจ้าของบิล";
    pub const ROLE_PARTICIPANT: &str = "สมาชิกในบิล";
    pub const ROLE_PAYER: &str = "สมาชิกผู้จ่าย";
    pub const ROLE_ACCOUNT_HOLDER: &str = "เจ้าของบัญชี";
    pub const INVALID_INPUT: &str = "ข้อมูลไม่ถูกต้อง";
    pub const SETTLEMENT_FAILED: &str = "คำนวณยอดไม่สำเร็จ";
    pub const STORAGE_FAILED: &str = "บันทึกข้อมูลไม่สำเร็จ";
    pub const JOIN_CODE_EXHAUSTED: &str = "สร้างรหัสเข้าร่วมบิลไม่สำเร็จ ลองใหม่อีกครั้ง";
    pub const ID: &str = "รหัส";
    pub const TITLE: &str = "ชื่อบิล";
    pub const NOTE: &str = "หมายเหตุ";
    pub const JOIN_CODE: &str = "รหัสเข้าร่วม";
    pub const MEMBER_COUNT: &str = "จำนวนสมาชิก";
    pub const ITEM_COUNT: &str = "จำนวนรายการ";
    pub const NAME: &str = "ชื่อ";
    pub const GUEST: &str = "แขก";
    pub const PRICE: &str = "ราคา";
    pub const QUANTITY: &str = "จำนวน";
    pub const TOTAL: &str = "รวม";
    pub const WEIGHT: &str = "สัดส่วน";
    pub const FIXED_AMOUNT: &str = "ยอดกำหนดเอง";
    pub const INCLUDED: &str = "รวมในราคาแล้ว";
    pub const BANK: &str = "ธนาคาร";
    pub const ACCOUNT_NUMBER: &str = "เลขบัญชี";
    pub const ACCOUNT_NAME: &str = "ชื่อบัญชี";
    pub const DEFAULT_ACCOUNT: &str = "บัญชีหลัก";
}

#[cfg(not(feature = "th"))]
pub mod strings {
    pub const MEMBER: &str = "Member";
    pub const BASE: &str = "Base";
    pub const SERVICE_CHARGE: &str = "SC";
    pub const VAT: &str = "VAT";
    pub const NET: &str = "Net";
    pub const PAID: &str = "Paid";
    pub const UNPAID: &str = "Unpaid";
    pub const ITEM: &str = "Item";
    pub const AMOUNT: &str = "Amount";
    pub const GRAND_TOTAL: &str = "Grand total";
    pub const STATUS: &str = "Status";
    pub const STATUS_DRAFT: &str = "Draft";
    pub const STATUS_COMPLETED: &str = "Completed";
    pub const STATUS_CANCELLED: &str = "Cancelled";
    pub const PAY_TO: &str = "Pay to";
    pub const PROMPT_PAY: &str = "PromptPay";
    pub const WARNINGS: &str = "Warnings";
    pub const RESOURCE_BILL: &str = "Bill";
    pub const RESOURCE_MEMBER: &str = "Member";
    pub const RESOURCE_ITEM: &str = "Item";
    pub const RESOURCE_BANK_ACCOUNT: &str = "Bank account";
    pub const ROLE_OWNER: &str = "the bill owner";
    pub const ROLE_PARTICIPANT: &str = "a bill member";
    pub const ROLE_PAYER: &str = "the paying member";
    pub const ROLE_ACCOUNT_HOLDER: &str = "the account holder";
    pub const INVALID_INPUT: &str = "Invalid input";
    pub const SETTLEMENT_FAILED: &str = "Settlement calculation failed";
    pub const STORAGE_FAILED: &str = "Storage failed";
    pub const JOIN_CODE_EXHAUSTED: &str = "Could not generate a join code, please try again";
    pub const ID: &str = "ID";
    pub const TITLE: &str = "Title";
    pub const NOTE: &str = "Note";
    pub const JOIN_CODE: &str = "Code";
    pub const MEMBER_COUNT: &str = "Members";
    pub const ITEM_COUNT: &str = "Items";
    pub const NAME: &str = "Name";
    pub const GUEST: &str = "guest";
    pub const PRICE: &str = "Price";
    pub const QUANTITY: &str = "Qty";
    pub const TOTAL: &str = "Total";
    pub const WEIGHT: &str = "Weight";
    pub const FIXED_AMOUNT: &str = "Fixed";
    pub const INCLUDED: &str = "included";
    pub const BANK: &str = "Bank";
    pub const ACCOUNT_NUMBER: &str = "Account no.";
    pub const ACCOUNT_NAME: &str = "Account name";
    pub const DEFAULT_ACCOUNT: &str = "Default";
}

pub use strings::*;

#[cfg(feature = "th")]
pub fn not_found(resource: impl std::fmt::Display) -> String {
    format!("ไม่พบ{resource}")
}

#[cfg(feature = "th")]
pub fn forbidden(role: impl std::fmt::Display) -> String {
    format!("ทำรายการนี้ได้เฉพาะ{role}")
}

#[cfg(feature = "th")]
pub fn foreign_members(ids: impl std::fmt::Display) -> String {
    format!("สมาชิกต่อไปนี้ไม่ได้อยู่ในบิลนี้: {ids}")
}

#[cfg(feature = "th")]
pub fn owner_member_missing(item: impl std::fmt::Display, amount: impl std::fmt::Display) -> String {
    format!("รายการ {item} ไม่มีผู้รับผิดชอบ และไม่พบเจ้าของบิลในสมาชิก ({amount})")
}

#[cfg(feature = "th")]
pub fn fixed_amounts_exceed(item: impl std::fmt::Display, excess: impl std::fmt::Display) -> String {
    format!("ยอดกำหนดเองของรายการ {item} เกินราคารวม {excess}")
}

#[cfg(not(feature = "th"))]
pub fn not_found(resource: impl std::fmt::Display) -> String {
    format!("{resource} not found")
}

#[cfg(not(feature = "th"))]
pub fn forbidden(role: impl std::fmt::Display) -> String {
    format!("Only {role} can do this")
}

#[cfg(not(feature = "th"))]
pub fn foreign_members(ids: impl std::fmt::Display) -> String {
    format!("Members not in this bill: {ids}")
}

#[cfg(not(feature = "th"))]
pub fn owner_member_missing(item: impl std::fmt::Display, amount: impl std::fmt::Display) -> String {
    format!("Item {item} is unassigned and the bill owner is not a member ({amount} not charged)")
}

#[cfg(not(feature = "th"))]
pub fn fixed_amounts_exceed(item: impl std::fmt::Display, excess: impl std::fmt::Display) -> String {
    format!("Fixed amounts on item {item} exceed its total by {excess}")
}

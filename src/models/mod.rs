//! Data models

pub mod book;
pub mod loan;
pub mod member;
pub mod setting;

pub use book::{Book, NewBook};
pub use loan::{ActiveLoanRow, ClosedLoanRow, Loan, MemberHistoryRow};
pub use member::{Member, NewMember};
pub use setting::Setting;

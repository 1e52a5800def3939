use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Årsavgift utifrån den lagrade minor-flaggan.
/// Ren uppslagning: beräknas aldrig om från ålder.
pub fn annual_fee(minor: bool) -> Decimal {
    if minor {
        Decimal::new(100_00, 2)
    } else {
        Decimal::new(200_00, 2)
    }
}

/// Överskjutande belopp räknas som donation.
/// Härlett rapportvärde, lagras aldrig separat.
pub fn donation_amount(paid: Decimal, expected: Decimal) -> Option<Decimal> {
    let diff = paid - expected;
    if diff > Decimal::ZERO {
        Some(diff)
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    Cash,
    Credit,
    Debit,
}

impl PaymentMethod {
    pub fn as_db_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Credit => "credit",
            Self::Debit => "debit",
        }
    }

    pub fn from_db_str(s: &str) -> Self {
        match s {
            "credit" => Self::Credit,
            "debit" => Self::Debit,
            _ => Self::Cash,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Cash => "Kontant",
            Self::Credit => "Kreditkort",
            Self::Debit => "Betalkort",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentType {
    Membership,
    Donation,
}

impl PaymentType {
    pub fn as_db_str(&self) -> &'static str {
        match self {
            Self::Membership => "membership",
            Self::Donation => "donation",
        }
    }

    pub fn from_db_str(s: &str) -> Self {
        match s {
            "donation" => Self::Donation,
            _ => Self::Membership,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Membership => "Medlemsavgift",
            Self::Donation => "Donation",
        }
    }
}

/// Inbetalning från en medlem
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: Option<i64>,
    pub member_id: i64,
    pub amount: Decimal,
    pub payment_date: NaiveDate,
    pub method: PaymentMethod,
    /// Medlemsåret betalningen avser, inte kalenderåret den gjordes
    pub membership_year: i32,
    pub payment_type: PaymentType,
    pub installment_number: i32,
    pub created_at: Option<String>,
}

impl Payment {
    pub fn new(
        member_id: i64,
        amount: Decimal,
        payment_date: NaiveDate,
        method: PaymentMethod,
        membership_year: i32,
    ) -> Self {
        Self {
            id: None,
            member_id,
            amount,
            payment_date,
            method,
            membership_year,
            payment_type: PaymentType::Membership,
            installment_number: 1,
            created_at: None,
        }
    }

    pub fn validate(&self) -> Result<(), PaymentValidationError> {
        if self.amount <= Decimal::ZERO {
            return Err(PaymentValidationError::NonPositiveAmount);
        }
        if self.installment_number < 1 {
            return Err(PaymentValidationError::InvalidInstallment);
        }
        if !(1900..=2999).contains(&self.membership_year) {
            return Err(PaymentValidationError::InvalidMembershipYear);
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PaymentValidationError {
    #[error("Belopp måste vara större än noll")]
    NonPositiveAmount,
    #[error("Delbetalningsnummer måste vara minst 1")]
    InvalidInstallment,
    #[error("Ogiltigt medlemsår")]
    InvalidMembershipYear,
}

impl PaymentValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::NonPositiveAmount => "amount",
            Self::InvalidInstallment => "installment_number",
            Self::InvalidMembershipYear => "membership_year",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annual_fee_lookup() {
        assert_eq!(annual_fee(true), Decimal::new(100_00, 2));
        assert_eq!(annual_fee(false), Decimal::new(200_00, 2));
    }

    #[test]
    fn test_donation_from_overpayment() {
        // Minderårig betalar 150.00 mot förväntade 100.00 -> 50.00 donation
        let paid = Decimal::new(150_00, 2);
        assert_eq!(
            donation_amount(paid, annual_fee(true)),
            Some(Decimal::new(50_00, 2))
        );

        // Exakt eller för lite ger ingen donation
        assert_eq!(donation_amount(annual_fee(true), annual_fee(true)), None);
        assert_eq!(
            donation_amount(Decimal::new(80_00, 2), annual_fee(true)),
            None
        );
    }

    #[test]
    fn test_payment_validation() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let mut payment = Payment::new(1, Decimal::new(200_00, 2), date, PaymentMethod::Credit, 2024);
        assert!(payment.validate().is_ok());

        payment.amount = Decimal::ZERO;
        assert!(matches!(
            payment.validate(),
            Err(PaymentValidationError::NonPositiveAmount)
        ));

        payment.amount = Decimal::new(100_00, 2);
        payment.installment_number = 0;
        assert!(matches!(
            payment.validate(),
            Err(PaymentValidationError::InvalidInstallment)
        ));
    }
}

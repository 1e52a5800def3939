use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex};

use crate::models::{annual_fee, donation_amount, Payment, PaymentMethod, PaymentType};
use crate::utils::error::{AppError, AppResult};

pub struct PaymentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PaymentRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// Registrera betalning
    pub fn create(&self, payment: &mut Payment) -> AppResult<i64> {
        payment
            .validate()
            .map_err(|e| AppError::validation(e.field(), e.to_string()))?;

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO payments (member_id, amount, payment_date, payment_method,
                                   membership_year, payment_type, installment_number)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                payment.member_id,
                payment.amount.to_string(),
                payment.payment_date,
                payment.method.as_db_str(),
                payment.membership_year,
                payment.payment_type.as_db_str(),
                payment.installment_number,
            ],
        )?;

        let id = conn.last_insert_rowid();
        payment.id = Some(id);

        Ok(id)
    }

    /// Hämta betalning via ID
    pub fn find_by_id(&self, id: i64) -> AppResult<Option<Payment>> {
        let conn = self.conn.lock().unwrap();
        let payment = conn
            .query_row(
                "SELECT id, member_id, amount, payment_date, payment_method,
                        membership_year, payment_type, installment_number, created_at
                 FROM payments
                 WHERE id = ?",
                [id],
                Self::row_to_payment,
            )
            .ok();

        Ok(payment)
    }

    /// Betalningar för en medlem, senaste först
    pub fn find_by_member(&self, member_id: i64) -> AppResult<Vec<Payment>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, member_id, amount, payment_date, payment_method,
                    membership_year, payment_type, installment_number, created_at
             FROM payments
             WHERE member_id = ?
             ORDER BY payment_date DESC, id DESC",
        )?;

        let payments = stmt
            .query_map([member_id], Self::row_to_payment)?
            .filter_map(|r| r.ok())
            .collect();

        Ok(payments)
    }

    /// Ta bort betalning
    pub fn delete(&self, id: i64) -> AppResult<()> {
        let conn = self.conn.lock().unwrap();
        let rows = conn.execute("DELETE FROM payments WHERE id = ?", [id])?;

        if rows == 0 {
            return Err(AppError::not_found(format!(
                "Betalning med ID {} hittades inte",
                id
            )));
        }

        Ok(())
    }

    /// Summa medlemsavgiftsbetalningar för en medlem och ett medlemsår
    pub fn membership_total_for_year(&self, member_id: i64, year: i32) -> AppResult<Decimal> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT amount FROM payments
             WHERE member_id = ?1 AND membership_year = ?2 AND payment_type = 'membership'",
        )?;

        let total = stmt
            .query_map(params![member_id, year], |row| row.get::<_, String>(0))?
            .filter_map(|r| r.ok())
            .filter_map(|s| s.parse::<Decimal>().ok())
            .sum();

        Ok(total)
    }

    /// Härledd donation för ett medlemsår: det som betalats utöver
    /// årsavgiften enligt den lagrade minor-flaggan. Lagras aldrig.
    pub fn derived_donation_for_year(
        &self,
        member_id: i64,
        year: i32,
    ) -> AppResult<Option<Decimal>> {
        let minor: bool = {
            let conn = self.conn.lock().unwrap();
            conn.query_row(
                "SELECT minor FROM club_members WHERE id = ?",
                [member_id],
                |row| row.get(0),
            )
            .map_err(|_| {
                AppError::not_found(format!("Medlem med ID {} hittades inte", member_id))
            })?
        };

        let paid = self.membership_total_for_year(member_id, year)?;
        Ok(donation_amount(paid, annual_fee(minor)))
    }

    /// Datum för en medlems första betalning (tolkas som anslutningsdatum
    /// i rapporterna)
    pub fn earliest_payment_date(&self, member_id: i64) -> AppResult<Option<NaiveDate>> {
        let conn = self.conn.lock().unwrap();
        let date: Option<NaiveDate> = conn
            .query_row(
                "SELECT MIN(payment_date) FROM payments WHERE member_id = ?",
                [member_id],
                |row| row.get(0),
            )
            .ok()
            .flatten();

        Ok(date)
    }

    fn row_to_payment(row: &Row) -> rusqlite::Result<Payment> {
        Ok(Payment {
            id: row.get(0).ok(),
            member_id: row.get(1)?,
            amount: row
                .get::<_, String>(2)?
                .parse::<Decimal>()
                .unwrap_or_default(),
            payment_date: row.get(3)?,
            method: PaymentMethod::from_db_str(&row.get::<_, String>(4)?),
            membership_year: row.get(5)?,
            payment_type: PaymentType::from_db_str(&row.get::<_, String>(6)?),
            installment_number: row.get(7)?,
            created_at: row.get(8).ok(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{testutil, Database};

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_create_and_list() {
        let db = setup_db();
        let repo = db.payments();
        let location_id = testutil::location(&db, "Centralhallen");
        let member_id = testutil::member(&db, "alva", location_id);

        testutil::payment(&db, member_id, "100.00", 2024, "2024-01-15");
        testutil::payment(&db, member_id, "100.00", 2024, "2024-03-05");

        let payments = repo.find_by_member(member_id).unwrap();
        assert_eq!(payments.len(), 2);
        // Senaste först
        assert_eq!(payments[0].payment_date, testutil::date("2024-03-05"));
        assert_eq!(payments[0].amount, Decimal::new(100_00, 2));
    }

    #[test]
    fn test_rejects_nonpositive_amount() {
        let db = setup_db();
        let repo = db.payments();
        let location_id = testutil::location(&db, "Centralhallen");
        let member_id = testutil::member(&db, "bert", location_id);

        let mut payment = Payment::new(
            member_id,
            Decimal::ZERO,
            testutil::date("2024-01-15"),
            PaymentMethod::Cash,
            2024,
        );
        assert!(matches!(
            repo.create(&mut payment),
            Err(AppError::Validation { .. })
        ));
    }

    #[test]
    fn test_rejects_unknown_member() {
        let db = setup_db();
        let repo = db.payments();

        let mut payment = Payment::new(
            424242,
            Decimal::new(200_00, 2),
            testutil::date("2024-01-15"),
            PaymentMethod::Debit,
            2024,
        );
        assert!(matches!(
            repo.create(&mut payment),
            Err(AppError::ForeignKey(_))
        ));
    }

    #[test]
    fn test_derived_donation() {
        let db = setup_db();
        let repo = db.payments();
        let location_id = testutil::location(&db, "Centralhallen");

        // Minderårig som betalar 150.00 mot förväntade 100.00
        let minor_id = testutil::member_with(
            &db,
            "cilla",
            location_id,
            testutil::date("2011-05-15"),
            true,
            true,
        );
        testutil::payment(&db, minor_id, "150.00", 2024, "2024-02-01");

        let donation = repo.derived_donation_for_year(minor_id, 2024).unwrap();
        assert_eq!(donation, Some(Decimal::new(50_00, 2)));

        // Vuxen som betalar exakt avgift -> ingen donation
        let adult_id = testutil::member(&db, "david", location_id);
        testutil::payment(&db, adult_id, "200.00", 2024, "2024-02-01");
        assert_eq!(repo.derived_donation_for_year(adult_id, 2024).unwrap(), None);
    }

    #[test]
    fn test_donation_sums_installments() {
        let db = setup_db();
        let repo = db.payments();
        let location_id = testutil::location(&db, "Centralhallen");
        let member_id = testutil::member(&db, "erika", location_id);

        // Två delbetalningar om totalt 230.00 mot förväntade 200.00
        testutil::payment(&db, member_id, "120.00", 2024, "2024-01-15");
        testutil::payment(&db, member_id, "110.00", 2024, "2024-06-15");

        let donation = repo.derived_donation_for_year(member_id, 2024).unwrap();
        assert_eq!(donation, Some(Decimal::new(30_00, 2)));
    }

    #[test]
    fn test_earliest_payment_date() {
        let db = setup_db();
        let repo = db.payments();
        let location_id = testutil::location(&db, "Centralhallen");
        let member_id = testutil::member(&db, "frida", location_id);

        assert_eq!(repo.earliest_payment_date(member_id).unwrap(), None);

        testutil::payment(&db, member_id, "200.00", 2023, "2023-04-01");
        testutil::payment(&db, member_id, "200.00", 2024, "2024-01-15");

        assert_eq!(
            repo.earliest_payment_date(member_id).unwrap(),
            Some(testutil::date("2023-04-01"))
        );
    }
}

//! Demodata för test och demonstration, motsvarar en nystartad
//! förening med två anläggningar

use chrono::{Datelike, Duration};
use rust_decimal::Decimal;
use tracing::info;

use crate::db::Database;
use crate::models::*;
use crate::utils::date::today;
use crate::utils::error::AppResult;

/// Fyll databasen med demodata. Gör ingenting om det redan finns
/// medlemmar, så att kommandot kan köras flera gånger.
pub fn populate_demo(db: &Database) -> AppResult<()> {
    if db.members().count()? > 0 {
        info!("Databasen har redan medlemmar, hoppar över demodata");
        return Ok(());
    }

    info!("Fyller databasen med demodata");

    let now = today();

    // Anläggningar
    let mut head = Location::new("Main Club Center".into(), LocationType::Head);
    head.address = "123 Sports Ave".into();
    head.city = "Montreal".into();
    head.province = "Quebec".into();
    head.postal_code = "H1A 1A1".into();
    head.phone = "514-555-0100".into();
    head.web_address = "https://mainclub.example".into();
    head.capacity = 500;
    let head_id = db.locations().create(&mut head)?;

    let mut branch = Location::new("East Branch".into(), LocationType::Branch);
    branch.address = "456 Athletic Blvd".into();
    branch.city = "Montreal".into();
    branch.province = "Quebec".into();
    branch.postal_code = "H2B 2B2".into();
    branch.phone = "514-555-0200".into();
    branch.web_address = "https://eastbranch.example".into();
    branch.capacity = 200;
    let branch_id = db.locations().create(&mut branch)?;

    // Personal
    let coach_id = seed_personnel(db, "John", "Smith", "1985-05-15", "123-45-6789", "SMIJ123456")?;
    let manager_id = seed_personnel(db, "Sarah", "Johnson", "1975-08-22", "987-65-4321", "JOHS987654")?;
    let assistant_id = seed_personnel(db, "Jane", "Doe", "1990-04-10", "234-56-7890", "DOEJ234567")?;
    let treasurer_id = seed_personnel(db, "Emily", "Clark", "1985-07-15", "345-67-8901", "CLAE345678")?;

    let assignments = [
        (coach_id, head_id, PersonnelRole::Coach, Mandate::Salaried, "2023-01-01"),
        (manager_id, head_id, PersonnelRole::GeneralManager, Mandate::Salaried, "2022-06-01"),
        (assistant_id, branch_id, PersonnelRole::AssistantCoach, Mandate::Volunteer, "2023-02-01"),
        (treasurer_id, head_id, PersonnelRole::Treasurer, Mandate::Salaried, "2023-03-01"),
    ];
    for (personnel_id, location_id, role, mandate, start) in assignments {
        let mut assignment = PersonnelAssignment::new(
            personnel_id,
            location_id,
            role,
            mandate,
            parse(start),
        );
        db.personnel().add_assignment(&mut assignment)?;
    }

    // Familjekontakter
    let mut guardian = FamilyMember {
        id: None,
        first_name: "Lisa".into(),
        last_name: "Parent".into(),
        birthdate: parse("1982-07-25"),
        ssn: "666-22-3333".into(),
        medicare_number: "PARL666222".into(),
        email: "lisa.parent@email.example".into(),
        phone: "514-555-2002".into(),
        address: "222 Parent Ave".into(),
        city: "Montreal".into(),
        province: "Quebec".into(),
        postal_code: "H5F 5F5".into(),
        location_id: branch_id,
        created_at: None,
        updated_at: None,
    };
    let guardian_id = db.families().create(&mut guardian)?;

    // Medlemmar
    let adult1_id = seed_member(db, "Alex", "Wilson", "1990-12-05", "777-33-4444", head_id, true, false)?;
    let adult2_id = seed_member(db, "Jane", "Miller", "1995-06-20", "888-44-5555", branch_id, true, false)?;
    let minor_id = seed_member(db, "Noah", "Parent", "2010-05-15", "999-55-6666", branch_id, true, true)?;

    // Vårdnad och sekundär kontakt för den minderåriga
    let mut relationship = FamilyRelationship::new(
        minor_id,
        guardian_id,
        RelationType::Mother,
        parse("2010-05-15"),
    );
    relationship.is_primary = true;
    relationship.emergency_contact = true;
    db.families().link_minor(&mut relationship)?;

    let mut secondary = SecondaryFamilyMember {
        id: None,
        primary_family_member_id: guardian_id,
        minor_id: Some(minor_id),
        first_name: "Marc".into(),
        last_name: "Parent".into(),
        phone: "514-555-9001".into(),
        relation_type: RelationType::Father,
        created_at: None,
    };
    db.families().create_secondary(&mut secondary)?;

    // Intressen
    let volleyball = db.members().find_or_create_hobby("Volleyball")?;
    let tennis = db.members().find_or_create_hobby("Tennis")?;
    db.members().add_hobby(adult1_id, volleyball)?;
    db.members().add_hobby(adult2_id, tennis)?;

    // Betalningar för innevarande år
    seed_payment(db, adult1_id, "200.00", PaymentMethod::Credit, now.format("%Y-01-15").to_string())?;
    seed_payment(db, adult2_id, "200.00", PaymentMethod::Debit, now.format("%Y-02-10").to_string())?;
    seed_payment(db, minor_id, "100.00", PaymentMethod::Cash, now.format("%Y-03-05").to_string())?;

    // Sessioner med lag och spelare
    let mut training = Session::new(
        now + Duration::days(7),
        chrono::NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
        SessionType::Training,
    );
    training.address = "123 Sports Ave".into();
    training.city = "Montreal".into();
    training.province = "Quebec".into();
    training.postal_code = "H1A 1A1".into();
    let training_id = db.sessions().create(&mut training)?;

    let mut game = Session::new(
        now + Duration::days(10),
        chrono::NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
        SessionType::Game,
    );
    game.address = "456 Athletic Blvd".into();
    game.city = "Montreal".into();
    game.province = "Quebec".into();
    game.postal_code = "H2B 2B2".into();
    let game_id = db.sessions().create(&mut game)?;

    let mut team1 = SessionTeam {
        id: None,
        session_id: training_id,
        team_number: 1,
        team_name: "Senior Volleyball Team".into(),
        location_id: head_id,
        head_coach_id: coach_id,
        gender: Gender::Male,
        score: None,
        created_at: None,
    };
    let team1_id = db.sessions().create_team(&mut team1)?;

    let mut team2 = SessionTeam {
        id: None,
        session_id: game_id,
        team_number: 1,
        team_name: "Junior Team".into(),
        location_id: branch_id,
        head_coach_id: assistant_id,
        gender: Gender::Female,
        score: Some(25),
        created_at: None,
    };
    let team2_id = db.sessions().create_team(&mut team2)?;

    let mut starter1 = PlayerAssignment::new(team1_id, adult1_id, Position::Setter);
    starter1.is_starter = true;
    db.sessions().assign_player(&mut starter1)?;

    let mut starter2 = PlayerAssignment::new(team2_id, adult2_id, Position::OutsideHitter);
    starter2.is_starter = true;
    db.sessions().assign_player(&mut starter2)?;

    // E-postlogg
    let mut welcome = EmailLog::new(
        head_id,
        "alex.wilson@email.example".into(),
        "Welcome to the Club".into(),
    );
    welcome.receiver_member_id = Some(adult1_id);
    welcome.body_preview = EmailLog::preview_of("Welcome Alex! We are excited to have you as a new member.");
    welcome.status = EmailStatus::Sent;
    db.email_logs().create(&mut welcome)?;

    let mut reminder = EmailLog::new(
        branch_id,
        "jane.miller@email.example".into(),
        "Training Session Reminder".into(),
    );
    reminder.receiver_member_id = Some(adult2_id);
    reminder.session_id = Some(training_id);
    reminder.email_type = EmailType::SessionNotification;
    reminder.status = EmailStatus::Sent;
    reminder.body_preview = EmailLog::preview_of("Don't forget about your training session next week.");
    db.email_logs().create(&mut reminder)?;

    // Långvarigt inaktiv medlem med gammal betalning, för
    // inaktivitetsrapporten
    let mut stale = crate::models::ClubMember {
        id: None,
        first_name: "Ingrid".into(),
        last_name: "Vilande".into(),
        birthdate: parse("1990-01-01"),
        ssn: "111-22-3333".into(),
        medicare_number: "VILI111222".into(),
        email: "ingrid.vilande@email.example".into(),
        phone: "514-555-4001".into(),
        address: "123 Inactive St".into(),
        city: "Montreal".into(),
        province: "Quebec".into(),
        postal_code: "H1A 1A1".into(),
        height_cm: Some(175),
        weight_kg: Some(70),
        location_id: head_id,
        active: false,
        minor: false,
        gender: Gender::Female,
        membership_number: None,
        date_joined: now - Duration::days(800),
        created_at: None,
        updated_at: None,
    };
    let stale_id = db.members().create(&mut stale)?;

    let mut old_payment = Payment::new(
        stale_id,
        "100.00".parse::<Decimal>().unwrap(),
        now - Duration::days(400),
        PaymentMethod::Cash,
        now.year() - 2,
    );
    db.payments().create(&mut old_payment)?;

    info!(
        "Demodata klar: {} anläggningar, {} personal, {} medlemmar, {} familjekontakter",
        db.locations().count()?,
        db.personnel().count()?,
        db.members().count()?,
        db.families().count()?,
    );

    Ok(())
}

fn parse(s: &str) -> chrono::NaiveDate {
    crate::utils::date::parse_date(s).expect("ogiltigt datum i demodata")
}

fn seed_personnel(
    db: &Database,
    first: &str,
    last: &str,
    birthdate: &str,
    ssn: &str,
    medicare: &str,
) -> AppResult<i64> {
    let mut person = Personnel {
        id: None,
        first_name: first.into(),
        last_name: last.into(),
        birthdate: parse(birthdate),
        ssn: ssn.into(),
        medicare_number: medicare.into(),
        email: format!(
            "{}.{}@club.example",
            first.to_lowercase(),
            last.to_lowercase()
        ),
        phone: "514-555-1001".into(),
        address: "789 Coach St".into(),
        city: "Montreal".into(),
        province: "Quebec".into(),
        postal_code: "H3C 3C3".into(),
        created_at: None,
        updated_at: None,
    };
    db.personnel().create(&mut person)
}

#[allow(clippy::too_many_arguments)]
fn seed_member(
    db: &Database,
    first: &str,
    last: &str,
    birthdate: &str,
    ssn: &str,
    location_id: i64,
    active: bool,
    minor: bool,
) -> AppResult<i64> {
    let mut member = ClubMember {
        id: None,
        first_name: first.into(),
        last_name: last.into(),
        birthdate: parse(birthdate),
        ssn: ssn.into(),
        medicare_number: format!("{}{}", &ssn[..3], first.to_uppercase()),
        email: format!(
            "{}.{}@email.example",
            first.to_lowercase(),
            last.to_lowercase()
        ),
        phone: "514-555-3001".into(),
        address: "333 Member Rd".into(),
        city: "Montreal".into(),
        province: "Quebec".into(),
        postal_code: "H7G 7G7".into(),
        height_cm: Some(175),
        weight_kg: Some(70),
        location_id,
        active,
        minor,
        gender: Gender::Male,
        membership_number: None,
        date_joined: today(),
        created_at: None,
        updated_at: None,
    };
    db.members().create(&mut member)
}

fn seed_payment(
    db: &Database,
    member_id: i64,
    amount: &str,
    method: PaymentMethod,
    date: String,
) -> AppResult<i64> {
    let payment_date = parse(&date);
    let mut payment = Payment::new(
        member_id,
        amount.parse::<Decimal>().expect("ogiltigt belopp i demodata"),
        payment_date,
        method,
        payment_date.year(),
    );
    db.payments().create(&mut payment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_populate_is_idempotent() {
        let db = Database::open_in_memory().unwrap();

        populate_demo(&db).unwrap();
        let members_after_first = db.members().count().unwrap();
        assert!(members_after_first > 0);

        populate_demo(&db).unwrap();
        assert_eq!(db.members().count().unwrap(), members_after_first);
    }

    #[test]
    fn test_demo_data_feeds_inactive_report() {
        let db = Database::open_in_memory().unwrap();
        populate_demo(&db).unwrap();

        let inactive = db.members().find_inactive(today()).unwrap();
        assert_eq!(inactive.len(), 1);
        assert_eq!(inactive[0].first_name, "Ingrid");
    }
}

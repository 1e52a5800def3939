//! Gemensamma fixturer för repository- och rapporttester

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::db::Database;
use crate::models::*;

pub(crate) fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub(crate) fn location(db: &Database, name: &str) -> i64 {
    location_in(db, name, "Montreal", "Quebec")
}

pub(crate) fn location_in(db: &Database, name: &str, city: &str, province: &str) -> i64 {
    let mut loc = Location::new(name.to_string(), LocationType::Branch);
    loc.city = city.to_string();
    loc.province = province.to_string();
    loc.capacity = 200;
    db.locations().create(&mut loc).unwrap()
}

pub(crate) fn personnel(db: &Database, name: &str) -> i64 {
    let mut person = Personnel {
        id: None,
        first_name: name.to_string(),
        last_name: "Tränarsson".to_string(),
        birthdate: date("1980-03-10"),
        ssn: format!("p-ssn-{}", name),
        medicare_number: format!("p-med-{}", name),
        email: format!("{}@klubb.example", name),
        phone: "514-555-1000".to_string(),
        address: "1 Coach St".to_string(),
        city: "Montreal".to_string(),
        province: "Quebec".to_string(),
        postal_code: "H3C 3C3".to_string(),
        created_at: None,
        updated_at: None,
    };
    db.personnel().create(&mut person).unwrap()
}

pub(crate) fn member(db: &Database, name: &str, location_id: i64) -> i64 {
    member_with(db, name, location_id, date("1990-01-15"), true, false)
}

pub(crate) fn member_with(
    db: &Database,
    name: &str,
    location_id: i64,
    birthdate: NaiveDate,
    active: bool,
    minor: bool,
) -> i64 {
    let mut m = crate::models::member::test_member(name, birthdate, location_id);
    m.active = active;
    m.minor = minor;
    db.members().create(&mut m).unwrap()
}

pub(crate) fn family_member(db: &Database, name: &str, location_id: i64) -> i64 {
    let mut fm = FamilyMember {
        id: None,
        first_name: name.to_string(),
        last_name: "Föräldersson".to_string(),
        birthdate: date("1982-07-25"),
        ssn: format!("f-ssn-{}", name),
        medicare_number: format!("f-med-{}", name),
        email: format!("{}@familj.example", name),
        phone: "514-555-2000".to_string(),
        address: "2 Parent Ave".to_string(),
        city: "Montreal".to_string(),
        province: "Quebec".to_string(),
        postal_code: "H5F 5F5".to_string(),
        location_id,
        created_at: None,
        updated_at: None,
    };
    db.families().create(&mut fm).unwrap()
}

pub(crate) fn session(db: &Database, day: &str, session_type: SessionType) -> i64 {
    let mut s = Session::new(
        date(day),
        chrono::NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
        session_type,
    );
    s.city = "Montreal".to_string();
    s.province = "Quebec".to_string();
    db.sessions().create(&mut s).unwrap()
}

pub(crate) fn team(
    db: &Database,
    session_id: i64,
    team_number: i32,
    location_id: i64,
    head_coach_id: i64,
    score: Option<i32>,
) -> i64 {
    let mut t = SessionTeam {
        id: None,
        session_id,
        team_number,
        team_name: format!("Lag {}", team_number),
        location_id,
        head_coach_id,
        gender: Gender::Male,
        score,
        created_at: None,
    };
    db.sessions().create_team(&mut t).unwrap()
}

pub(crate) fn assign(db: &Database, team_id: i64, member_id: i64, position: Position) -> i64 {
    let mut pa = PlayerAssignment::new(team_id, member_id, position);
    db.sessions().assign_player(&mut pa).unwrap()
}

pub(crate) fn payment(db: &Database, member_id: i64, amount: &str, year: i32, day: &str) -> i64 {
    let mut p = Payment::new(
        member_id,
        amount.parse::<Decimal>().unwrap(),
        date(day),
        PaymentMethod::Cash,
        year,
    );
    db.payments().create(&mut p).unwrap()
}

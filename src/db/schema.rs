/// SQL-schema för klubbregistret
///
/// Raderingspolicy är deklarerad explicit per främmande nyckel:
/// CASCADE för rent beroende rader (betalningar, laguppställningar,
/// vårdnadskopplingar), RESTRICT där historik eller verksamhet
/// blockerar (anläggningar, huvudtränare), SET NULL för loggreferenser.

pub const SCHEMA_VERSION: i32 = 2;

pub const CREATE_TABLES: &str = r#"
-- Anläggningar
CREATE TABLE IF NOT EXISTS locations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    type TEXT NOT NULL DEFAULT 'branch',
    address TEXT NOT NULL DEFAULT '',
    city TEXT NOT NULL DEFAULT '',
    province TEXT NOT NULL DEFAULT '',
    postal_code TEXT NOT NULL DEFAULT '',
    phone TEXT NOT NULL DEFAULT '',
    web_address TEXT NOT NULL DEFAULT '',
    capacity INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_locations_province_city ON locations(province, city);

-- Personal
CREATE TABLE IF NOT EXISTS personnel (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    birthdate TEXT NOT NULL,
    ssn TEXT NOT NULL UNIQUE,
    medicare_number TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    phone TEXT NOT NULL DEFAULT '',
    address TEXT NOT NULL DEFAULT '',
    city TEXT NOT NULL DEFAULT '',
    province TEXT NOT NULL DEFAULT '',
    postal_code TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_personnel_name ON personnel(last_name, first_name);

-- Personaltilldelningar (rollhistorik, end_date NULL = pågående)
CREATE TABLE IF NOT EXISTS personnel_assignments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    personnel_id INTEGER NOT NULL,
    location_id INTEGER NOT NULL,
    role TEXT NOT NULL,
    mandate TEXT NOT NULL DEFAULT 'salaried',
    start_date TEXT NOT NULL,
    end_date TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    FOREIGN KEY (personnel_id) REFERENCES personnel(id) ON DELETE CASCADE,
    FOREIGN KEY (location_id) REFERENCES locations(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_assignments_personnel ON personnel_assignments(personnel_id);
CREATE INDEX IF NOT EXISTS idx_assignments_location ON personnel_assignments(location_id);

-- Familjekontakter
CREATE TABLE IF NOT EXISTS family_members (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    birthdate TEXT NOT NULL,
    ssn TEXT NOT NULL UNIQUE,
    medicare_number TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    phone TEXT NOT NULL DEFAULT '',
    address TEXT NOT NULL DEFAULT '',
    city TEXT NOT NULL DEFAULT '',
    province TEXT NOT NULL DEFAULT '',
    postal_code TEXT NOT NULL DEFAULT '',
    location_id INTEGER NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
    FOREIGN KEY (location_id) REFERENCES locations(id) ON DELETE RESTRICT
);

-- Klubbmedlemmar
CREATE TABLE IF NOT EXISTS club_members (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    birthdate TEXT NOT NULL,
    ssn TEXT NOT NULL UNIQUE,
    medicare_number TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    phone TEXT NOT NULL DEFAULT '',
    address TEXT NOT NULL DEFAULT '',
    city TEXT NOT NULL DEFAULT '',
    province TEXT NOT NULL DEFAULT '',
    postal_code TEXT NOT NULL DEFAULT '',
    height_cm INTEGER,
    weight_kg INTEGER,
    location_id INTEGER NOT NULL,
    active INTEGER NOT NULL DEFAULT 1,
    minor INTEGER NOT NULL DEFAULT 0,
    gender TEXT NOT NULL DEFAULT 'M',
    membership_number TEXT NOT NULL UNIQUE,
    date_joined TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
    FOREIGN KEY (location_id) REFERENCES locations(id) ON DELETE RESTRICT
);

CREATE INDEX IF NOT EXISTS idx_members_location ON club_members(location_id);
CREATE INDEX IF NOT EXISTS idx_members_name ON club_members(last_name, first_name);

-- Sekundära kontakter för minderåriga
CREATE TABLE IF NOT EXISTS secondary_family_members (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    primary_family_member_id INTEGER NOT NULL,
    minor_id INTEGER,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    phone TEXT NOT NULL DEFAULT '',
    relation_type TEXT NOT NULL DEFAULT 'other',
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    FOREIGN KEY (primary_family_member_id) REFERENCES family_members(id) ON DELETE CASCADE,
    FOREIGN KEY (minor_id) REFERENCES club_members(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_secondary_primary ON secondary_family_members(primary_family_member_id);
CREATE INDEX IF NOT EXISTS idx_secondary_minor ON secondary_family_members(minor_id);

-- Vårdnadskopplingar minderårig <-> familjekontakt
CREATE TABLE IF NOT EXISTS family_relationships (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    minor_id INTEGER NOT NULL,
    major_id INTEGER NOT NULL,
    relation_type TEXT NOT NULL DEFAULT 'other',
    start_date TEXT NOT NULL,
    is_primary INTEGER NOT NULL DEFAULT 0,
    emergency_contact INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    FOREIGN KEY (minor_id) REFERENCES club_members(id) ON DELETE CASCADE,
    FOREIGN KEY (major_id) REFERENCES family_members(id) ON DELETE CASCADE,
    UNIQUE (minor_id, major_id)
);

-- Fritidsintressen
CREATE TABLE IF NOT EXISTS hobbies (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS member_hobbies (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    member_id INTEGER NOT NULL,
    hobby_id INTEGER NOT NULL,
    FOREIGN KEY (member_id) REFERENCES club_members(id) ON DELETE CASCADE,
    FOREIGN KEY (hobby_id) REFERENCES hobbies(id) ON DELETE CASCADE,
    UNIQUE (member_id, hobby_id)
);

-- Betalningar
CREATE TABLE IF NOT EXISTS payments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    member_id INTEGER NOT NULL,
    amount TEXT NOT NULL,
    payment_date TEXT NOT NULL,
    payment_method TEXT NOT NULL DEFAULT 'cash',
    membership_year INTEGER NOT NULL,
    payment_type TEXT NOT NULL DEFAULT 'membership',
    installment_number INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    FOREIGN KEY (member_id) REFERENCES club_members(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_payments_member_year ON payments(member_id, membership_year);

-- Sessioner (träningar och matcher)
CREATE TABLE IF NOT EXISTS sessions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    session_date TEXT NOT NULL,
    session_time TEXT NOT NULL,
    session_type TEXT NOT NULL DEFAULT 'training',
    address TEXT NOT NULL DEFAULT '',
    city TEXT NOT NULL DEFAULT '',
    province TEXT NOT NULL DEFAULT '',
    postal_code TEXT NOT NULL DEFAULT '',
    status TEXT NOT NULL DEFAULT 'scheduled',
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_sessions_date ON sessions(session_date, session_time);

-- Laguppställningar per session
CREATE TABLE IF NOT EXISTS session_teams (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id INTEGER NOT NULL,
    team_number INTEGER NOT NULL DEFAULT 1,
    team_name TEXT NOT NULL,
    location_id INTEGER NOT NULL,
    head_coach_id INTEGER NOT NULL,
    gender TEXT NOT NULL DEFAULT 'M',
    score INTEGER,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    FOREIGN KEY (session_id) REFERENCES sessions(id) ON DELETE CASCADE,
    FOREIGN KEY (location_id) REFERENCES locations(id) ON DELETE RESTRICT,
    FOREIGN KEY (head_coach_id) REFERENCES personnel(id) ON DELETE RESTRICT,
    UNIQUE (session_id, team_number)
);

CREATE INDEX IF NOT EXISTS idx_teams_session ON session_teams(session_id);
CREATE INDEX IF NOT EXISTS idx_teams_location ON session_teams(location_id);

-- Spelartilldelningar, unika per (lag, medlem)
CREATE TABLE IF NOT EXISTS player_assignments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    team_id INTEGER NOT NULL,
    member_id INTEGER NOT NULL,
    position TEXT NOT NULL,
    is_starter INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    FOREIGN KEY (team_id) REFERENCES session_teams(id) ON DELETE CASCADE,
    FOREIGN KEY (member_id) REFERENCES club_members(id) ON DELETE CASCADE,
    UNIQUE (team_id, member_id)
);

CREATE INDEX IF NOT EXISTS idx_player_assignments_member ON player_assignments(member_id);

-- E-postlogg
CREATE TABLE IF NOT EXISTS email_logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    sender_location_id INTEGER NOT NULL,
    receiver_member_id INTEGER,
    receiver_email TEXT NOT NULL,
    subject TEXT NOT NULL,
    body_preview TEXT NOT NULL DEFAULT '',
    email_type TEXT NOT NULL DEFAULT 'general',
    status TEXT NOT NULL DEFAULT 'pending',
    session_id INTEGER,
    sent_at TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    FOREIGN KEY (sender_location_id) REFERENCES locations(id) ON DELETE CASCADE,
    FOREIGN KEY (receiver_member_id) REFERENCES club_members(id) ON DELETE SET NULL,
    FOREIGN KEY (session_id) REFERENCES sessions(id) ON DELETE SET NULL
);

CREATE INDEX IF NOT EXISTS idx_email_logs_sender ON email_logs(sender_location_id);

-- Migrationshistorik
CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

/// Standardintressen att skapa vid första start
pub const DEFAULT_HOBBIES: &[&str] = &[
    "Swimming",
    "Tennis",
    "Basketball",
    "Volleyball",
    "Soccer",
    "Yoga",
];

/// Entitetsregister: (entitet, tabell), byggt vid kompilering
pub const ENTITIES: &[(&str, &str)] = &[
    ("Location", "locations"),
    ("Personnel", "personnel"),
    ("PersonnelAssignment", "personnel_assignments"),
    ("FamilyMember", "family_members"),
    ("SecondaryFamilyMember", "secondary_family_members"),
    ("ClubMember", "club_members"),
    ("FamilyRelationship", "family_relationships"),
    ("Hobby", "hobbies"),
    ("MemberHobby", "member_hobbies"),
    ("Payment", "payments"),
    ("Session", "sessions"),
    ("SessionTeam", "session_teams"),
    ("PlayerAssignment", "player_assignments"),
    ("EmailLog", "email_logs"),
];

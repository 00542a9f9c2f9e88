//! SQLite schema definition.

/// Complete database schema for the reference tables.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- WHO Child Growth Standards (term infants, Z -4 to +4)
-- ============================================================================

CREATE TABLE IF NOT EXISTS reference_curves (
    sex TEXT NOT NULL CHECK (sex IN ('Masculino', 'Feminino')),
    measure TEXT NOT NULL CHECK (measure IN ('weight', 'height', 'cephalic', 'bmi')),
    age_days INTEGER NOT NULL CHECK (age_days >= 0),
    z_neg_4 REAL NOT NULL,
    z_neg_3 REAL NOT NULL,
    z_neg_2 REAL NOT NULL,
    z_neg_1 REAL NOT NULL,
    z_0 REAL NOT NULL,                           -- median
    z_pos_1 REAL NOT NULL,
    z_pos_2 REAL NOT NULL,
    z_pos_3 REAL NOT NULL,
    z_pos_4 REAL NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (sex, measure, age_days)
);

-- ============================================================================
-- INTERGROWTH-21 (preterm, post-conceptual age in days, Z -3 to +3)
-- ============================================================================

CREATE TABLE IF NOT EXISTS intergrowth_curves (
    sex TEXT NOT NULL CHECK (sex IN ('Masculino', 'Feminino')),
    measure TEXT NOT NULL CHECK (measure IN ('weight', 'height', 'cephalic')),
    age_days INTEGER NOT NULL CHECK (age_days >= 0),
    z_neg_3 REAL NOT NULL,
    z_neg_2 REAL NOT NULL,
    z_neg_1 REAL NOT NULL,
    z_0 REAL NOT NULL,
    z_pos_1 REAL NOT NULL,
    z_pos_2 REAL NOT NULL,
    z_pos_3 REAL NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (sex, measure, age_days)
);
"#;

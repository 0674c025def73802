//! Initial database migration.
//!
//! Creates the enums, tables, constraints, and triggers for the prepaid
//! credit ledger. The schema enforces the core invariants independently of
//! the application code: balances and phone totals can never go negative,
//! credit request amounts are strictly positive, each credit request backs
//! at most one ledger entry, and ledger entries are append-only.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: TABLES
        // ============================================================
        db.execute_unprepared(SELLERS_SQL).await?;
        db.execute_unprepared(CREDIT_REQUESTS_SQL).await?;
        db.execute_unprepared(PHONE_NUMBERS_SQL).await?;
        db.execute_unprepared(LEDGER_ENTRIES_SQL).await?;

        // ============================================================
        // PART 3: TRIGGERS & FUNCTIONS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Credit request lifecycle
CREATE TYPE credit_request_status AS ENUM (
    'pending',
    'approved',
    'rejected'
);

-- Ledger entry kinds
CREATE TYPE entry_type AS ENUM (
    'credit_increase',
    'charge_sale'
);
";

const SELLERS_SQL: &str = r"
CREATE TABLE sellers (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    email VARCHAR(255) NOT NULL UNIQUE,
    phone VARCHAR(32) NOT NULL UNIQUE,
    credit_balance NUMERIC(15,2) NOT NULL DEFAULT 0
        CHECK (credit_balance >= 0),
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const CREDIT_REQUESTS_SQL: &str = r"
CREATE TABLE credit_requests (
    id UUID PRIMARY KEY,
    seller_id UUID NOT NULL REFERENCES sellers(id) ON DELETE RESTRICT,
    amount NUMERIC(15,2) NOT NULL CHECK (amount > 0),
    status credit_request_status NOT NULL DEFAULT 'pending',
    notes TEXT,
    processed_by UUID,
    processed_at TIMESTAMPTZ,
    requested_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_credit_requests_seller ON credit_requests (seller_id);
CREATE INDEX idx_credit_requests_status ON credit_requests (status);
";

const PHONE_NUMBERS_SQL: &str = r"
CREATE TABLE phone_numbers (
    id UUID PRIMARY KEY,
    number VARCHAR(20) NOT NULL UNIQUE,
    total_charged NUMERIC(15,2) NOT NULL DEFAULT 0
        CHECK (total_charged >= 0),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const LEDGER_ENTRIES_SQL: &str = r"
CREATE TABLE ledger_entries (
    id UUID PRIMARY KEY,
    seller_id UUID NOT NULL REFERENCES sellers(id) ON DELETE RESTRICT,
    entry_type entry_type NOT NULL,
    amount NUMERIC(15,2) NOT NULL,
    balance_after NUMERIC(15,2) NOT NULL CHECK (balance_after >= 0),
    credit_request_id UUID REFERENCES credit_requests(id) ON DELETE RESTRICT,
    phone_number_id UUID REFERENCES phone_numbers(id) ON DELETE RESTRICT,
    description TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    -- Entry sign must match its kind
    CONSTRAINT chk_ledger_entries_signed_amount CHECK (
        (entry_type = 'credit_increase' AND amount > 0)
        OR (entry_type = 'charge_sale' AND amount < 0)
    )
);

CREATE INDEX idx_ledger_entries_seller ON ledger_entries (seller_id, created_at);
CREATE INDEX idx_ledger_entries_phone ON ledger_entries (phone_number_id)
    WHERE phone_number_id IS NOT NULL;

-- At most one ledger entry per credit request. The row lock plus status
-- guard already prevents double approval; this index backstops it at the
-- schema level.
CREATE UNIQUE INDEX uq_ledger_entries_credit_request
    ON ledger_entries (credit_request_id)
    WHERE credit_request_id IS NOT NULL;
";

const TRIGGERS_SQL: &str = r"
-- Ledger entries are append-only
CREATE OR REPLACE FUNCTION forbid_ledger_mutation()
RETURNS TRIGGER AS $$
BEGIN
    RAISE EXCEPTION 'ledger entries are append-only';
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_ledger_entries_immutable
    BEFORE UPDATE OR DELETE ON ledger_entries
    FOR EACH ROW
    EXECUTE FUNCTION forbid_ledger_mutation();

-- Keep updated_at current on mutable tables
CREATE OR REPLACE FUNCTION set_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = NOW();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_sellers_updated_at
    BEFORE UPDATE ON sellers
    FOR EACH ROW
    EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_phone_numbers_updated_at
    BEFORE UPDATE ON phone_numbers
    FOR EACH ROW
    EXECUTE FUNCTION set_updated_at();
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS ledger_entries CASCADE;
DROP TABLE IF EXISTS phone_numbers CASCADE;
DROP TABLE IF EXISTS credit_requests CASCADE;
DROP TABLE IF EXISTS sellers CASCADE;

DROP FUNCTION IF EXISTS forbid_ledger_mutation CASCADE;
DROP FUNCTION IF EXISTS set_updated_at CASCADE;

DROP TYPE IF EXISTS entry_type;
DROP TYPE IF EXISTS credit_request_status;
";

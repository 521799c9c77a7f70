//! Initial database migration.
//!
//! Creates the directory tables, the leave-type catalogue, the quota ledger
//! and the request table, with their enums, indexes and triggers.

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
        // PART 2: DIRECTORY
        // ============================================================
        db.execute_unprepared(EMPLOYEES_SQL).await?;
        db.execute_unprepared(CITIES_SQL).await?;

        // ============================================================
        // PART 3: LEAVE TYPES & QUOTAS
        // ============================================================
        db.execute_unprepared(LEAVE_TYPES_SQL).await?;
        db.execute_unprepared(LEAVE_QUOTAS_SQL).await?;

        // ============================================================
        // PART 4: REQUESTS
        // ============================================================
        db.execute_unprepared(TIME_OFF_REQUESTS_SQL).await?;

        // ============================================================
        // PART 5: TRIGGERS
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
CREATE TYPE request_kind AS ENUM ('leave', 'business_travel');

CREATE TYPE request_status AS ENUM ('pending', 'approved', 'rejected');
";

const EMPLOYEES_SQL: &str = r"
-- Synchronised from the HR system; supervisor_id forms the reporting tree
CREATE TABLE employees (
    id UUID PRIMARY KEY,
    supervisor_id UUID REFERENCES employees(id) ON DELETE SET NULL,
    full_name VARCHAR(255) NOT NULL,
    email VARCHAR(255),
    active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_employees_supervisor ON employees(supervisor_id) WHERE active;
";

const CITIES_SQL: &str = r"
CREATE TABLE cities (
    id UUID PRIMARY KEY,
    name VARCHAR(100) NOT NULL,
    province VARCHAR(100) NOT NULL,
    active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (name, province)
);
";

const LEAVE_TYPES_SQL: &str = r"
CREATE TABLE leave_types (
    id UUID PRIMARY KEY,
    code VARCHAR(32) NOT NULL UNIQUE,
    name VARCHAR(100) NOT NULL,
    description TEXT,
    min_duration_days INTEGER CHECK (min_duration_days > 0),
    max_duration_days INTEGER CHECK (max_duration_days > 0),
    consumes_quota BOOLEAN NOT NULL DEFAULT false,
    is_paid BOOLEAN NOT NULL DEFAULT true,
    requires_document BOOLEAN NOT NULL DEFAULT false,
    active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_duration_bounds CHECK (
        min_duration_days IS NULL
        OR max_duration_days IS NULL
        OR min_duration_days <= max_duration_days
    )
);
";

const LEAVE_QUOTAS_SQL: &str = r"
-- One row per employee and calendar year; mutated under SELECT ... FOR UPDATE
CREATE TABLE leave_quotas (
    employee_id UUID NOT NULL REFERENCES employees(id) ON DELETE CASCADE,
    year INTEGER NOT NULL CHECK (year BETWEEN 1970 AND 9999),
    remaining_days INTEGER NOT NULL CHECK (remaining_days >= 0),
    used_days INTEGER NOT NULL DEFAULT 0 CHECK (used_days >= 0),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    PRIMARY KEY (employee_id, year)
);

CREATE INDEX idx_leave_quotas_year ON leave_quotas(year);
";

const TIME_OFF_REQUESTS_SQL: &str = r"
-- Leave and business-travel requests share one table, told apart by kind
CREATE TABLE time_off_requests (
    id BIGSERIAL PRIMARY KEY,
    external_id UUID NOT NULL UNIQUE,
    kind request_kind NOT NULL,
    employee_id UUID NOT NULL REFERENCES employees(id),
    start_date DATE NOT NULL,
    end_date DATE NOT NULL,
    reason TEXT,
    status request_status NOT NULL DEFAULT 'pending',

    -- Leave only
    leave_type_id UUID REFERENCES leave_types(id),
    total_days INTEGER CHECK (total_days > 0),

    -- Business travel only
    city_id UUID REFERENCES cities(id),

    approver_id UUID REFERENCES employees(id),
    decided_at TIMESTAMPTZ,
    approval_note TEXT,
    rejection_reason TEXT,

    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    created_by UUID NOT NULL REFERENCES employees(id),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_by UUID REFERENCES employees(id),

    CONSTRAINT chk_period CHECK (start_date <= end_date),
    CONSTRAINT chk_kind_details CHECK (
        (kind = 'leave' AND leave_type_id IS NOT NULL AND total_days IS NOT NULL AND city_id IS NULL)
        OR (kind = 'business_travel' AND city_id IS NOT NULL AND leave_type_id IS NULL)
    ),
    CONSTRAINT chk_decision CHECK (
        (status = 'pending' AND approver_id IS NULL AND decided_at IS NULL)
        OR (status <> 'pending' AND approver_id IS NOT NULL AND decided_at IS NOT NULL)
    ),
    CONSTRAINT chk_rejection_reason CHECK (status <> 'rejected' OR rejection_reason IS NOT NULL)
);

-- Employee history, newest first
CREATE INDEX idx_requests_employee ON time_off_requests(kind, employee_id, created_at DESC);

-- Overlap and current-request lookups
CREATE INDEX idx_requests_approved_period ON time_off_requests(kind, employee_id, start_date, end_date)
    WHERE status = 'approved';

-- Supervisor queue
CREATE INDEX idx_requests_pending ON time_off_requests(kind, employee_id)
    WHERE status = 'pending';
";

const TRIGGERS_SQL: &str = r"
-- ============================================================
-- FUNCTION: touch_updated_at
-- Keeps updated_at current on every UPDATE
-- ============================================================
CREATE OR REPLACE FUNCTION touch_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = now();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_employees_updated_at
    BEFORE UPDATE ON employees
    FOR EACH ROW EXECUTE FUNCTION touch_updated_at();

CREATE TRIGGER trg_leave_types_updated_at
    BEFORE UPDATE ON leave_types
    FOR EACH ROW EXECUTE FUNCTION touch_updated_at();

CREATE TRIGGER trg_leave_quotas_updated_at
    BEFORE UPDATE ON leave_quotas
    FOR EACH ROW EXECUTE FUNCTION touch_updated_at();

-- ============================================================
-- FUNCTION: prevent_decided_modification
-- A decided request is immutable
-- ============================================================
CREATE OR REPLACE FUNCTION prevent_decided_modification()
RETURNS TRIGGER AS $$
BEGIN
    IF OLD.status <> 'pending' THEN
        RAISE EXCEPTION 'Request % is already %', OLD.external_id, OLD.status;
    END IF;
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_prevent_decided_mod
    BEFORE UPDATE ON time_off_requests
    FOR EACH ROW EXECUTE FUNCTION prevent_decided_modification();
";

const DROP_ALL_SQL: &str = r"
-- Drop triggers
DROP TRIGGER IF EXISTS trg_prevent_decided_mod ON time_off_requests;
DROP TRIGGER IF EXISTS trg_leave_quotas_updated_at ON leave_quotas;
DROP TRIGGER IF EXISTS trg_leave_types_updated_at ON leave_types;
DROP TRIGGER IF EXISTS trg_employees_updated_at ON employees;

-- Drop functions
DROP FUNCTION IF EXISTS prevent_decided_modification();
DROP FUNCTION IF EXISTS touch_updated_at();

-- Drop tables (reverse order of creation)
DROP TABLE IF EXISTS time_off_requests CASCADE;
DROP TABLE IF EXISTS leave_quotas CASCADE;
DROP TABLE IF EXISTS leave_types CASCADE;
DROP TABLE IF EXISTS cities CASCADE;
DROP TABLE IF EXISTS employees CASCADE;

-- Drop enums
DROP TYPE IF EXISTS request_status;
DROP TYPE IF EXISTS request_kind;
";

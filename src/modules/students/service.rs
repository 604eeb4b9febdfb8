//! Student records and room assignment.
//!
//! Lifecycle operations lock the student row, apply the rule from
//! [`Student`], and write the new room reference in one transaction. Under
//! the coupled [`OccupancyPolicy`] the affected rooms are locked too, in
//! ascending id order, and their counters move with the reference.

use anyhow::Context;
use chrono::Utc;
use sqlx::{PgConnection, PgPool};
use tracing::{info, instrument, warn};

use dormex_config::OccupancyPolicy;
use dormex_core::{AppError, hash_password};
use dormex_models::{AuthProvider, RoomId, StudentId, UserId, UserRole};

use crate::modules::rooms::service::RoomService;
use crate::modules::students::model::{
    CreateStudentDto, RoomChange, Student, StudentRecord, StudentStatus, UpdateStudentDto,
};
use crate::modules::users::service::UserService;

const STUDENT_COLUMNS: &str = "id, user_id, roll_number, phone, department, year, address, \
     guardian_name, guardian_phone, date_of_birth, joining_date, leaving_date, room_id, status, \
     created_at, updated_at";

fn record_query(filter: &str) -> String {
    format!(
        "SELECT s.id, s.user_id, s.roll_number, s.phone, s.department, s.year, s.address, \
                s.guardian_name, s.guardian_phone, s.date_of_birth, s.joining_date, \
                s.leaving_date, s.room_id, s.status, s.created_at, s.updated_at, \
                u.name, u.email, u.profile_picture, r.room_number \
         FROM students s \
         JOIN users u ON u.id = s.user_id \
         LEFT JOIN rooms r ON r.id = s.room_id \
         {filter} \
         ORDER BY s.created_at DESC"
    )
}

pub struct StudentService;

impl StudentService {
    async fn fetch_record(db: &PgPool, id: StudentId) -> Result<StudentRecord, AppError> {
        sqlx::query_as::<_, StudentRecord>(&record_query("WHERE s.id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch student")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found_entity("Student", "id", id))
    }

    async fn lock_student(conn: &mut PgConnection, id: StudentId) -> Result<Student, AppError> {
        sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| AppError::not_found_entity("Student", "id", id))
    }

    async fn save_lifecycle(conn: &mut PgConnection, student: &Student) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE students SET room_id = $2, status = $3, leaving_date = $4, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(student.id)
        .bind(student.room_id)
        .bind(student.status)
        .bind(student.leaving_date)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Moves room counters for `change` when the policy couples them.
    ///
    /// Rooms are locked in ascending id order. A released room that no longer
    /// exists, or is already empty, is skipped with a warning; the acquired
    /// room must exist and have a free slot.
    async fn apply_room_change(
        conn: &mut PgConnection,
        policy: OccupancyPolicy,
        change: RoomChange,
    ) -> Result<(), AppError> {
        if !policy.is_coupled() || change.is_noop() {
            return Ok(());
        }

        let mut room_ids: Vec<RoomId> = [change.released, change.acquired]
            .into_iter()
            .flatten()
            .collect();
        room_ids.sort();

        for room_id in room_ids {
            let Some(mut room) = RoomService::find_room_for_update(conn, room_id).await? else {
                if change.acquired == Some(room_id) {
                    return Err(AppError::not_found_entity("Room", "id", room_id));
                }
                warn!(room_id = %room_id, "Released room no longer exists");
                continue;
            };

            if change.acquired == Some(room_id) {
                room.increment()?;
            } else if room.decrement().is_err() {
                warn!(room_id = %room_id, "Released room was already empty");
                continue;
            }

            RoomService::save_room(conn, &room).await?;
        }

        Ok(())
    }

    #[instrument(skip(db, dto), fields(roll_number = %dto.roll_number))]
    pub async fn create_student(
        db: &PgPool,
        dto: CreateStudentDto,
    ) -> Result<StudentRecord, AppError> {
        if UserService::email_exists(db, &dto.email).await? {
            return Err(AppError::conflict("Email already registered"));
        }
        if Self::roll_number_exists(db, &dto.roll_number).await? {
            return Err(AppError::conflict("Roll number already exists"));
        }

        let password_hash = hash_password(&dto.password)?;

        let mut tx = db.begin().await?;

        let user = UserService::insert(
            &mut *tx,
            &dto.name,
            &dto.email,
            Some(&password_hash),
            UserRole::Student,
            AuthProvider::Local,
            None,
        )
        .await?;

        let id: StudentId = sqlx::query_scalar(
            "INSERT INTO students (user_id, roll_number, phone, department, year, address, \
                 guardian_name, guardian_phone, date_of_birth, joining_date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, COALESCE($10, CURRENT_DATE)) \
             RETURNING id",
        )
        .bind(user.id)
        .bind(&dto.roll_number)
        .bind(&dto.phone)
        .bind(&dto.department)
        .bind(&dto.year)
        .bind(&dto.address)
        .bind(&dto.guardian_name)
        .bind(&dto.guardian_phone)
        .bind(dto.date_of_birth)
        .bind(dto.joining_date)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(student_id = %id, user_id = %user.id, "Student created");
        Self::fetch_record(db, id).await
    }

    async fn roll_number_exists(db: &PgPool, roll_number: &str) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM students WHERE roll_number = $1)")
                .bind(roll_number)
                .fetch_one(db)
                .await
                .context("Failed to check roll number")
                .map_err(AppError::database)?;

        Ok(exists)
    }

    #[instrument(skip(db))]
    pub async fn get_all_students(db: &PgPool) -> Result<Vec<StudentRecord>, AppError> {
        let students = sqlx::query_as::<_, StudentRecord>(&record_query(""))
            .fetch_all(db)
            .await
            .context("Failed to fetch students")
            .map_err(AppError::database)?;

        Ok(students)
    }

    /// Most recently created students.
    #[instrument(skip(db))]
    pub async fn get_recent_students(
        db: &PgPool,
        limit: i64,
    ) -> Result<Vec<StudentRecord>, AppError> {
        let sql = format!("{} LIMIT $1", record_query(""));
        let students = sqlx::query_as::<_, StudentRecord>(&sql)
            .bind(limit)
            .fetch_all(db)
            .await
            .context("Failed to fetch recent students")
            .map_err(AppError::database)?;

        Ok(students)
    }

    #[instrument(skip(db))]
    pub async fn get_student(db: &PgPool, id: StudentId) -> Result<StudentRecord, AppError> {
        Self::fetch_record(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn get_student_by_roll_number(
        db: &PgPool,
        roll_number: &str,
    ) -> Result<StudentRecord, AppError> {
        sqlx::query_as::<_, StudentRecord>(&record_query("WHERE s.roll_number = $1"))
            .bind(roll_number)
            .fetch_optional(db)
            .await
            .context("Failed to fetch student by roll number")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found_entity("Student", "roll_number", roll_number))
    }

    /// The student profile linked to a user account, if any.
    #[instrument(skip(db))]
    pub async fn find_by_user_id(db: &PgPool, user_id: UserId) -> Result<Option<Student>, AppError> {
        let student = sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch student by user")
        .map_err(AppError::database)?;

        Ok(student)
    }

    /// Case-insensitive substring match on name or roll number.
    #[instrument(skip(db))]
    pub async fn search_students(
        db: &PgPool,
        keyword: &str,
    ) -> Result<Vec<StudentRecord>, AppError> {
        let pattern = format!(
            "%{}%",
            keyword
                .trim()
                .replace('\\', "\\\\")
                .replace('%', "\\%")
                .replace('_', "\\_")
        );

        let students = sqlx::query_as::<_, StudentRecord>(&record_query(
            "WHERE u.name ILIKE $1 OR s.roll_number ILIKE $1",
        ))
        .bind(pattern)
        .fetch_all(db)
        .await
        .context("Failed to search students")
        .map_err(AppError::database)?;

        Ok(students)
    }

    #[instrument(skip(db))]
    pub async fn get_students_by_status(
        db: &PgPool,
        status: StudentStatus,
    ) -> Result<Vec<StudentRecord>, AppError> {
        let students = sqlx::query_as::<_, StudentRecord>(&record_query("WHERE s.status = $1"))
            .bind(status)
            .fetch_all(db)
            .await
            .context("Failed to fetch students by status")
            .map_err(AppError::database)?;

        Ok(students)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_student(
        db: &PgPool,
        id: StudentId,
        dto: UpdateStudentDto,
    ) -> Result<StudentRecord, AppError> {
        let mut tx = db.begin().await?;
        let student = Self::lock_student(&mut tx, id).await?;

        if let Some(name) = &dto.name {
            sqlx::query("UPDATE users SET name = $2, updated_at = NOW() WHERE id = $1")
                .bind(student.user_id)
                .bind(name)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query(
            "UPDATE students SET \
                phone = COALESCE($2, phone), \
                department = COALESCE($3, department), \
                year = COALESCE($4, year), \
                address = COALESCE($5, address), \
                guardian_name = COALESCE($6, guardian_name), \
                guardian_phone = COALESCE($7, guardian_phone), \
                date_of_birth = COALESCE($8, date_of_birth), \
                updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(&dto.phone)
        .bind(&dto.department)
        .bind(&dto.year)
        .bind(&dto.address)
        .bind(&dto.guardian_name)
        .bind(&dto.guardian_phone)
        .bind(dto.date_of_birth)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Self::fetch_record(db, id).await
    }

    /// Changes status. Leaving ACTIVE drops the room reference; LEFT and
    /// TRANSFERRED also stamp today's date as the leaving date.
    #[instrument(skip(db))]
    pub async fn update_status(
        db: &PgPool,
        policy: OccupancyPolicy,
        id: StudentId,
        status: StudentStatus,
    ) -> Result<StudentRecord, AppError> {
        let mut tx = db.begin().await?;
        let mut student = Self::lock_student(&mut tx, id).await?;

        let change = student.change_status(status, Utc::now().date_naive());
        Self::apply_room_change(&mut tx, policy, change).await?;
        Self::save_lifecycle(&mut tx, &student).await?;

        tx.commit().await?;

        info!(student_id = %id, ?status, released = ?change.released, "Student status changed");
        Self::fetch_record(db, id).await
    }

    /// Points an ACTIVE student at `room_id`, replacing any earlier room.
    #[instrument(skip(db))]
    pub async fn assign_room(
        db: &PgPool,
        policy: OccupancyPolicy,
        id: StudentId,
        room_id: RoomId,
    ) -> Result<StudentRecord, AppError> {
        let mut tx = db.begin().await?;
        let mut student = Self::lock_student(&mut tx, id).await?;

        let change = student.assign_room(room_id)?;

        if policy.is_coupled() {
            Self::apply_room_change(&mut tx, policy, change).await?;
        } else {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM rooms WHERE id = $1)")
                    .bind(room_id)
                    .fetch_one(&mut *tx)
                    .await?;
            if !exists {
                return Err(AppError::not_found_entity("Room", "id", room_id));
            }
        }

        Self::save_lifecycle(&mut tx, &student).await?;
        tx.commit().await?;

        info!(student_id = %id, room_id = %room_id, "Room assigned");
        Self::fetch_record(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn vacate_room(
        db: &PgPool,
        policy: OccupancyPolicy,
        id: StudentId,
    ) -> Result<StudentRecord, AppError> {
        let mut tx = db.begin().await?;
        let mut student = Self::lock_student(&mut tx, id).await?;

        let change = student.vacate_room()?;
        Self::apply_room_change(&mut tx, policy, change).await?;
        Self::save_lifecycle(&mut tx, &student).await?;

        tx.commit().await?;

        info!(student_id = %id, released = ?change.released, "Room vacated");
        Self::fetch_record(db, id).await
    }

    /// Deletes the student record and disables the linked account. The user
    /// row is kept so complaint assignees and audit data stay resolvable.
    #[instrument(skip(db))]
    pub async fn delete_student(
        db: &PgPool,
        policy: OccupancyPolicy,
        id: StudentId,
    ) -> Result<(), AppError> {
        let mut tx = db.begin().await?;
        let student = Self::lock_student(&mut tx, id).await?;

        let change = RoomChange {
            released: student.room_id,
            acquired: None,
        };
        Self::apply_room_change(&mut tx, policy, change).await?;

        sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        UserService::set_enabled(&mut *tx, student.user_id, false).await?;

        tx.commit().await?;

        info!(student_id = %id, user_id = %student.user_id, "Student deleted");
        Ok(())
    }
}

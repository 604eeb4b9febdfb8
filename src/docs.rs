use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use dormex_core::{DeletedResource, ErrorKind, ErrorResponse};
use dormex_models::auth::{AuthResponse, LoginRequest, RefreshTokenRequest, RegisterRequest};
use dormex_models::blocks::{BlockResponse, CreateBlockDto, UpdateBlockDto};
use dormex_models::complaints::{
    ComplaintCategory, ComplaintResponse, ComplaintStatus, CreateComplaintDto, UpdateComplaintDto,
    UpdateComplaintStatusDto,
};
use dormex_models::dashboard::{
    BlockOccupancy, ComplaintSummary, DashboardStats, RecentActivity,
};
use dormex_models::menus::{
    CreateMenuDto, DailyMenuResponse, DayOfWeek, MealType, MenuResponse, UpdateMenuDto,
};
use dormex_models::rooms::{
    CreateRoomDto, RoomResponse, RoomStatus, UpdateRoomDto, UpdateRoomStatusDto,
};
use dormex_models::students::{
    AssignRoomDto, CreateStudentDto, StudentResponse, StudentStatus, UpdateStudentDto,
    UpdateStudentStatusDto,
};
use dormex_models::users::{AuthProvider, UserProfile, UserRole, UserSummary};

/// Success bodies are wrapped as `{ "message": ..., "data": <schema> }`;
/// each path documents the `data` schema.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::register_student,
        crate::modules::auth::controller::register_admin,
        crate::modules::auth::controller::refresh_token,
        crate::modules::auth::controller::google_login,
        crate::modules::auth::controller::google_callback,
        crate::modules::users::controller::get_me,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::get_all_students,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::get_student_by_roll_number,
        crate::modules::students::controller::search_students,
        crate::modules::students::controller::get_students_by_status,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::update_student_status,
        crate::modules::students::controller::assign_room,
        crate::modules::students::controller::vacate_room,
        crate::modules::students::controller::delete_student,
        crate::modules::blocks::controller::create_block,
        crate::modules::blocks::controller::get_all_blocks,
        crate::modules::blocks::controller::get_active_blocks,
        crate::modules::blocks::controller::get_block,
        crate::modules::blocks::controller::update_block,
        crate::modules::blocks::controller::toggle_block_status,
        crate::modules::blocks::controller::delete_block,
        crate::modules::rooms::controller::create_room,
        crate::modules::rooms::controller::get_all_rooms,
        crate::modules::rooms::controller::get_room,
        crate::modules::rooms::controller::get_rooms_by_block,
        crate::modules::rooms::controller::get_rooms_by_floor,
        crate::modules::rooms::controller::get_vacant_rooms,
        crate::modules::rooms::controller::get_vacant_rooms_by_block,
        crate::modules::rooms::controller::update_room,
        crate::modules::rooms::controller::update_room_status,
        crate::modules::rooms::controller::increment_occupancy,
        crate::modules::rooms::controller::decrement_occupancy,
        crate::modules::rooms::controller::delete_room,
        crate::modules::complaints::controller::create_complaint,
        crate::modules::complaints::controller::get_my_complaints,
        crate::modules::complaints::controller::get_all_complaints,
        crate::modules::complaints::controller::get_pending_complaints,
        crate::modules::complaints::controller::get_complaints_by_student,
        crate::modules::complaints::controller::get_complaints_by_status,
        crate::modules::complaints::controller::get_complaints_by_category,
        crate::modules::complaints::controller::get_complaint,
        crate::modules::complaints::controller::update_complaint,
        crate::modules::complaints::controller::update_complaint_status,
        crate::modules::complaints::controller::delete_complaint,
        crate::modules::menu::controller::get_today_menu,
        crate::modules::menu::controller::get_weekly_menu,
        crate::modules::menu::controller::get_menu_by_day,
        crate::modules::menu::controller::get_menu_by_day_and_meal,
        crate::modules::menu::controller::create_menu,
        crate::modules::menu::controller::get_menu,
        crate::modules::menu::controller::update_menu,
        crate::modules::menu::controller::update_menu_by_day_and_meal,
        crate::modules::menu::controller::delete_menu,
        crate::modules::dashboard::controller::get_stats,
        crate::modules::dashboard::controller::get_recent_activity,
        crate::modules::dashboard::controller::get_block_occupancy,
        crate::modules::dashboard::controller::get_complaint_summary,
    ),
    components(
        schemas(
            ErrorResponse,
            ErrorKind,
            DeletedResource,
            LoginRequest,
            RegisterRequest,
            RefreshTokenRequest,
            AuthResponse,
            UserRole,
            AuthProvider,
            UserSummary,
            UserProfile,
            StudentStatus,
            StudentResponse,
            CreateStudentDto,
            UpdateStudentDto,
            UpdateStudentStatusDto,
            AssignRoomDto,
            BlockResponse,
            CreateBlockDto,
            UpdateBlockDto,
            RoomStatus,
            RoomResponse,
            CreateRoomDto,
            UpdateRoomDto,
            UpdateRoomStatusDto,
            ComplaintCategory,
            ComplaintStatus,
            ComplaintResponse,
            CreateComplaintDto,
            UpdateComplaintDto,
            UpdateComplaintStatusDto,
            DayOfWeek,
            MealType,
            MenuResponse,
            DailyMenuResponse,
            CreateMenuDto,
            UpdateMenuDto,
            DashboardStats,
            RecentActivity,
            BlockOccupancy,
            ComplaintSummary,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login, registration, token refresh and Google sign-in"),
        (name = "Users", description = "Current user profile"),
        (name = "Students", description = "Student records and room assignment"),
        (name = "Blocks", description = "Hostel blocks"),
        (name = "Rooms", description = "Rooms and occupancy"),
        (name = "Complaints", description = "Student complaints"),
        (name = "Mess Menu", description = "Weekly mess menu"),
        (name = "Dashboard", description = "Admin dashboard aggregates")
    ),
    info(
        title = "Dormex API",
        version = "0.1.0",
        description = "Hostel administration API: students, rooms, blocks, complaints and the mess menu.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

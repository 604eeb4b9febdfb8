//! # Dormex Models
//!
//! Entities, DTOs and domain rules for the Dormex API.
//!
//! # Modules
//!
//! - [`ids`]: typed entity IDs
//! - [`users`], [`auth`]: accounts and token payloads
//! - [`blocks`], [`rooms`]: hostel layout and the room occupancy state machine
//! - [`students`]: student lifecycle and room assignment
//! - [`complaints`]: complaint workflow
//! - [`menus`]: weekly mess menu
//! - [`dashboard`]: admin aggregates
//!
//! The rules in [`rooms`] and [`students`] are pure: services load rows under
//! a lock, apply the rule, then write the result back in the same transaction.

pub mod auth;
pub mod blocks;
pub mod complaints;
pub mod dashboard;
pub mod ids;
pub mod menus;
pub mod rooms;
pub mod students;
pub mod users;

pub use auth::{AuthResponse, LoginRequest, RefreshTokenRequest, RegisterRequest};
pub use blocks::{Block, BlockResponse, BlockWithStats, CreateBlockDto, UpdateBlockDto};
pub use complaints::{
    Complaint, ComplaintCategory, ComplaintRecord, ComplaintResponse, ComplaintStatus,
    CreateComplaintDto, UpdateComplaintDto, UpdateComplaintStatusDto,
};
pub use dashboard::{BlockOccupancy, ComplaintSummary, DashboardStats, RecentActivity};
pub use ids::{BlockId, ComplaintId, MenuId, RoomId, StudentId, UserId};
pub use menus::{
    CreateMenuDto, DailyMenuResponse, DayOfWeek, MealType, MenuResponse, MessMenu, UpdateMenuDto,
};
pub use rooms::{
    CreateRoomDto, OccupancyError, Room, RoomResponse, RoomStatus, RoomWithBlock, UpdateRoomDto,
    UpdateRoomStatusDto,
};
pub use students::{
    AssignRoomDto, CreateStudentDto, LifecycleError, RoomChange, Student, StudentRecord,
    StudentResponse, StudentStatus, UpdateStudentDto, UpdateStudentStatusDto,
};
pub use users::{AuthProvider, User, UserProfile, UserRole, UserSummary};

pub mod admin;
pub mod identity;
pub mod likes;
pub mod middleware;
pub mod rest;
pub mod sessions;
pub mod state;

// Re-export the handlers the binary wires into the router.
pub use admin::{get_admin_settings_handler, update_admin_settings_handler, upload_image_handler};
pub use likes::{like_destination_handler, like_status_handler, recommend_list_handler};
pub use middleware::require_auth;
pub use rest::{
    biorhythm_handler, biorhythm_interpret_handler, generate_quiz_questions_handler,
    recommend_handler,
};
pub use sessions::{
    get_session_detail_handler, save_session_handler, update_session_image_handler,
};

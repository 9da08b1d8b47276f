pub mod supabase;

pub use supabase::{DataServiceError, SupabaseClient};

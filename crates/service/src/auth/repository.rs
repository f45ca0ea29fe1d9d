use async_trait::async_trait;

use super::errors::AuthError;

/// Repository abstraction for auth-related persistence.
#[async_trait]
pub trait AdminRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<models::admin::Model>, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use uuid::Uuid;

    #[derive(Default)]
    pub struct MockAdminRepository {
        admins: Mutex<HashMap<String, models::admin::Model>>, // key: email
    }

    impl MockAdminRepository {
        pub fn insert(&self, email: &str, password_hash: &str) -> Uuid {
            let now = Utc::now().into();
            let admin = models::admin::Model {
                id: Uuid::new_v4(),
                email: email.to_string(),
                password_hash: password_hash.to_string(),
                created_at: now,
                updated_at: now,
            };
            let id = admin.id;
            self.admins.lock().unwrap().insert(email.to_string(), admin);
            id
        }
    }

    #[async_trait]
    impl AdminRepository for MockAdminRepository {
        async fn find_by_email(&self, email: &str) -> Result<Option<models::admin::Model>, AuthError> {
            let admins = self.admins.lock().unwrap();
            Ok(admins.get(email).cloned())
        }
    }
}

//! `localStorage` persistence for the bearer token and the API base URL.

use crowdwatch::session::{StoreError, TokenStore, TOKEN_KEY};

/// Default API base URL
pub const DEFAULT_API_BASE: &str = "http://localhost:3000";

const API_URL_KEY: &str = "crowdwatch_api_url";

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

/// API base URL from local storage (`crowdwatch_api_url`) or the default
pub fn get_api_base() -> String {
    let url = local_storage()
        .and_then(|storage| storage.get_item(API_URL_KEY).ok().flatten())
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    url.trim_end_matches('/').to_string()
}

/// Token store backed by `window.localStorage["auth_token"]`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageTokenStore;

impl LocalStorageTokenStore {
    fn storage(&self) -> Result<web_sys::Storage, StoreError> {
        local_storage().ok_or_else(|| StoreError::Unavailable("localStorage".to_string()))
    }
}

impl TokenStore for LocalStorageTokenStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        let token = self
            .storage()?
            .get_item(TOKEN_KEY)
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))?;
        Ok(token.filter(|t| !t.is_empty()))
    }

    fn save(&self, token: &str) -> Result<(), StoreError> {
        self.storage()?
            .set_item(TOKEN_KEY, token)
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.storage()?
            .remove_item(TOKEN_KEY)
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))
    }
}

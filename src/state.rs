use crate::config::AppConfig;
use crate::services::gateway::PersistenceGateway;

pub struct AppState {
    pub gateway: Box<dyn PersistenceGateway>,
    pub config: AppConfig,
}

use std::sync::Arc;

use anyhow::Context as _;

use midplat_auth::{Permission, UserRole};
use midplat_console::{
    AuthBackend, ConsoleConfig, GuardOutcome, HttpAuthBackend, MemoryTokenStore, RouteMeta, Session,
    TokenStore,
};

/// Usage: `midplat-console [path] [permission] [role]`
///
/// Runs the route guard for `path` against the configured backend and, if
/// navigation may proceed, prints the viewer's menu tree as JSON.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    midplat_observability::init();

    let config = ConsoleConfig::from_env().context("loading console configuration")?;

    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| config.default_path.clone());
    let mut meta = RouteMeta::protected();
    if let Some(permission) = args.next().filter(|p| !p.is_empty()) {
        meta = meta.require_permission(Permission::from(permission));
    }
    if let Some(role) = args.next() {
        let role: UserRole = role.parse().context("parsing required role")?;
        meta = meta.require_role(role);
    }

    let tokens: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new(config.token.clone()));
    let backend: Arc<dyn AuthBackend> =
        Arc::new(HttpAuthBackend::new(&config).context("building HTTP client")?);
    let mut session = Session::new(backend, tokens);

    let guard = session.guard(&config);
    let outcome = guard.check(&path, &meta).await;
    tracing::info!(%path, ?outcome, "route guard decision");

    match outcome {
        GuardOutcome::Proceed => {
            if session.restore().await.context("loading current user")?.is_none() {
                println!("{path}");
                return Ok(());
            }
            let tree = session
                .refresh_menu(config.platform)
                .await
                .context("loading menus")?;
            println!("{}", serde_json::to_string_pretty(tree)?);
        }
        GuardOutcome::RedirectToLogin => println!("{}", guard.login_path()),
        GuardOutcome::RedirectToDefault => println!("{}", guard.default_path()),
    }

    Ok(())
}

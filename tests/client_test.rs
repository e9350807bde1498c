//! The editor client against a real server on a loopback port.

mod common;

use anyhow::Result;
use czaplisko::client::{AuthSession, ClientError, CmsBackend, EditSession, HttpBackend, PageContent};
use czaplisko::database::entities::ContentType;
use czaplisko::server::app::create_app;

use common::{spawn_app, ADMIN_EMAIL, ADMIN_PASSWORD};

async fn serve(app: &common::TestApp) -> Result<String> {
    let router = create_app(app.state.clone(), None)?;
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    Ok(format!("http://{}", addr))
}

#[tokio::test]
async fn test_login_session_and_logout() -> Result<()> {
    let app = spawn_app().await?;
    let backend = HttpBackend::new(&serve(&app).await?)?;
    let mut auth = AuthSession::new();

    assert!(auth.fetch_user(&backend).await.is_none());

    let wrong = auth.login(&backend, ADMIN_EMAIL, "zle-haslo").await;
    assert!(matches!(wrong, Err(ClientError::Unauthorized(_))));
    assert!(!auth.is_authenticated());

    let user = auth.login(&backend, ADMIN_EMAIL, ADMIN_PASSWORD).await?;
    assert_eq!(user.email, ADMIN_EMAIL);
    assert_eq!(backend.me().await?.email, ADMIN_EMAIL);

    auth.logout(&backend).await?;
    assert!(!auth.is_authenticated());
    assert!(auth.fetch_user(&backend).await.is_none());

    Ok(())
}

#[tokio::test]
async fn test_edit_session_saves_through_the_api() -> Result<()> {
    let app = spawn_app().await?;
    let backend = HttpBackend::new(&serve(&app).await?)?;
    let mut session = EditSession::new();

    assert!(!session.check_admin_status(&backend).await);

    backend.login(ADMIN_EMAIL, ADMIN_PASSWORD).await?;
    assert!(session.check_admin_status(&backend).await);
    assert_eq!(session.admin_email(), ADMIN_EMAIL);

    let mut pages = [PageContent::load(&backend, "home").await];
    assert!(!pages[0].exists("hero", "title"));

    assert!(session.toggle_edit_mode(|_| true));
    session.register_change("home", "hero", "title", "Siedlisko nad stawem", ContentType::Text, None);
    session.register_change(
        "home",
        "hero",
        "image",
        "https://cdn.czapliskosiedlisko.pl/images/staw.webp",
        ContentType::Image,
        None,
    );
    assert_eq!(pages[0].get(&session, "hero", "title", "Domyślny"), "Siedlisko nad stawem");

    assert!(session.save_all_changes(&backend, &mut pages).await);
    assert!(!session.is_dirty());
    assert_eq!(pages[0].get(&session, "hero", "title", ""), "Siedlisko nad stawem");
    assert_eq!(pages[0].get_type("hero", "image"), ContentType::Image);

    let reloaded = backend.page_content("home").await?;
    assert_eq!(reloaded["hero"]["title"].value, "Siedlisko nad stawem");

    Ok(())
}

#[tokio::test]
async fn test_rejected_save_keeps_changes() -> Result<()> {
    let app = spawn_app().await?;
    let backend = HttpBackend::new(&serve(&app).await?)?;
    let mut session = EditSession::new();
    session.register_change("home", "hero", "title", "Bez logowania", ContentType::Text, None);

    assert!(!session.save_all_changes(&backend, &mut []).await);
    assert_eq!(session.change_count(), 1);

    let response = backend
        .bulk_save(session.pending_changes().cloned().collect())
        .await;
    assert!(matches!(response, Err(ClientError::Unauthorized(_))));

    Ok(())
}

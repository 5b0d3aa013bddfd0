use axum::http::StatusCode;
use temp_dir::TempDir;

mod helpers;

async fn seed_author_recipes(
    app: &helpers::TestApp,
    token: &str,
    count: usize,
) -> anyhow::Result<()> {
    let tag = helpers::create_tag(app, "Dinner", "#49B64E", "dinner").await?;
    let flour = helpers::create_ingredient(app, "Flour", "g").await?;

    for index in 0..count {
        helpers::create_recipe(
            app,
            token,
            &format!("Recipe {index}"),
            &[tag.to_owned()],
            &[(flour.to_owned(), 100)],
        )
        .await?;
    }

    Ok(())
}

#[tokio::test]
async fn subscribe_returns_author_with_recipes() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let app = helpers::setup(dir.child("db.sqlite3")).await?;

    let author_token = helpers::signup(&app, "author").await?;
    seed_author_recipes(&app, &author_token, 3).await?;

    let reader_token = helpers::signup(&app, "reader").await?;
    let (_, author_me) =
        helpers::request(&app, "GET", "/api/users/me", Some(&author_token), None).await?;
    let author_id = author_me["id"].as_str().unwrap_or_default().to_owned();

    let (status, value) = helpers::request(
        &app,
        "POST",
        &format!("/api/users/{author_id}/subscribe"),
        Some(&reader_token),
        None,
    )
    .await?;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(value["username"], "author");
    assert_eq!(value["is_subscribed"], true);
    assert_eq!(value["recipes_count"], 3);
    assert_eq!(value["recipes"].as_array().map(Vec::len), Some(3));
    assert!(value["recipes"][0]["cooking_time"].is_number());

    // Author detail now reports the subscription
    let (_, value) = helpers::request(
        &app,
        "GET",
        &format!("/api/users/{author_id}"),
        Some(&reader_token),
        None,
    )
    .await?;
    assert_eq!(value["is_subscribed"], true);

    Ok(())
}

#[tokio::test]
async fn subscribe_conflicts_and_unknown_author() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let app = helpers::setup(dir.child("db.sqlite3")).await?;

    let token = helpers::signup(&app, "reader").await?;
    helpers::signup(&app, "author").await?;

    let (_, me) = helpers::request(&app, "GET", "/api/users/me", Some(&token), None).await?;
    let my_id = me["id"].as_str().unwrap_or_default().to_owned();

    let (status, value) = helpers::request(
        &app,
        "POST",
        &format!("/api/users/{my_id}/subscribe"),
        Some(&token),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["errors"], "Cannot subscribe to yourself");

    let (status, value) = helpers::request(
        &app,
        "POST",
        "/api/users/unknown-id/subscribe",
        Some(&token),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(value["detail"], "User not found");

    let author_token = helpers::login(&app, "author").await?;
    let (_, author_me) =
        helpers::request(&app, "GET", "/api/users/me", Some(&author_token), None).await?;
    let author_id = author_me["id"].as_str().unwrap_or_default().to_owned();

    let uri = format!("/api/users/{author_id}/subscribe");
    let (status, _) = helpers::request(&app, "POST", &uri, Some(&token), None).await?;
    assert_eq!(status, StatusCode::CREATED);

    let (status, value) = helpers::request(&app, "POST", &uri, Some(&token), None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["errors"], "Already subscribed");

    Ok(())
}

#[tokio::test]
async fn unsubscribe_removes_the_subscription() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let app = helpers::setup(dir.child("db.sqlite3")).await?;

    let token = helpers::signup(&app, "reader").await?;
    let author_token = helpers::signup(&app, "author").await?;

    let (_, author_me) =
        helpers::request(&app, "GET", "/api/users/me", Some(&author_token), None).await?;
    let author_id = author_me["id"].as_str().unwrap_or_default().to_owned();
    let uri = format!("/api/users/{author_id}/subscribe");

    let (status, value) = helpers::request(&app, "DELETE", &uri, Some(&token), None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["errors"], "Not subscribed to this user");

    let (status, _) = helpers::request(&app, "POST", &uri, Some(&token), None).await?;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = helpers::request(&app, "DELETE", &uri, Some(&token), None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, value) = helpers::request(
        &app,
        "GET",
        &format!("/api/users/{author_id}"),
        Some(&token),
        None,
    )
    .await?;
    assert_eq!(value["is_subscribed"], false);

    Ok(())
}

#[tokio::test]
async fn subscriptions_list_caps_recipe_previews() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let app = helpers::setup(dir.child("db.sqlite3")).await?;

    let author_token = helpers::signup(&app, "author").await?;
    seed_author_recipes(&app, &author_token, 5).await?;

    let reader_token = helpers::signup(&app, "reader").await?;
    let (_, author_me) =
        helpers::request(&app, "GET", "/api/users/me", Some(&author_token), None).await?;
    let author_id = author_me["id"].as_str().unwrap_or_default().to_owned();

    let (status, _) = helpers::request(
        &app,
        "POST",
        &format!("/api/users/{author_id}/subscribe"),
        Some(&reader_token),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);

    let (status, value) = helpers::request(
        &app,
        "GET",
        "/api/users/subscriptions?recipes_limit=2",
        Some(&reader_token),
        None,
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["count"], 1);
    assert_eq!(value["results"][0]["username"], "author");
    assert_eq!(value["results"][0]["recipes_count"], 5);
    assert_eq!(value["results"][0]["recipes"].as_array().map(Vec::len), Some(2));

    Ok(())
}

use axum::http::{StatusCode, header};
use temp_dir::TempDir;

mod helpers;

struct Kitchen {
    token: String,
    pancakes: String,
    bread: String,
}

/// Two recipes sharing flour and salt, bread alone brings sugar.
async fn seed_kitchen(app: &helpers::TestApp) -> anyhow::Result<Kitchen> {
    let tag = helpers::create_tag(app, "Dinner", "#49B64E", "dinner").await?;
    let flour = helpers::create_ingredient(app, "Flour", "g").await?;
    let salt = helpers::create_ingredient(app, "Salt", "pinch").await?;
    let sugar = helpers::create_ingredient(app, "Sugar", "g").await?;

    let token = helpers::signup(app, "cook").await?;
    let pancakes = helpers::create_recipe(
        app,
        &token,
        "Pancakes",
        &[tag.to_owned()],
        &[(flour.to_owned(), 200), (salt.to_owned(), 1)],
    )
    .await?;
    let bread = helpers::create_recipe(
        app,
        &token,
        "Bread",
        &[tag],
        &[(flour, 100), (salt, 2), (sugar, 50)],
    )
    .await?;

    Ok(Kitchen {
        token,
        pancakes,
        bread,
    })
}

#[tokio::test]
async fn cart_membership_toggles() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let app = helpers::setup(dir.child("db.sqlite3")).await?;
    let kitchen = seed_kitchen(&app).await?;
    let token = &kitchen.token;

    let uri = format!("/api/recipes/{}/shopping_cart", kitchen.pancakes);

    let (status, value) = helpers::request(&app, "POST", &uri, Some(token), None).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(value["name"], "Pancakes");
    assert!(value["cooking_time"].is_number());

    let (status, value) = helpers::request(&app, "POST", &uri, Some(token), None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["errors"], "Already in shopping cart");

    let (_, value) = helpers::request(
        &app,
        "GET",
        "/api/recipes?is_in_shopping_cart=1",
        Some(token),
        None,
    )
    .await?;
    assert_eq!(value["count"], 1);
    assert_eq!(value["results"][0]["name"], "Pancakes");
    assert_eq!(value["results"][0]["is_in_shopping_cart"], true);

    let (status, _) = helpers::request(&app, "DELETE", &uri, Some(token), None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, value) = helpers::request(&app, "DELETE", &uri, Some(token), None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["errors"], "Not in shopping cart");

    let (status, value) = helpers::request(
        &app,
        "POST",
        "/api/recipes/missing/shopping_cart",
        Some(token),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(value["detail"], "Recipe not found");

    Ok(())
}

#[tokio::test]
async fn download_merges_shared_ingredients() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let app = helpers::setup(dir.child("db.sqlite3")).await?;
    let kitchen = seed_kitchen(&app).await?;
    let token = &kitchen.token;

    for id in [&kitchen.pancakes, &kitchen.bread] {
        let (status, _) = helpers::request(
            &app,
            "POST",
            &format!("/api/recipes/{id}/shopping_cart"),
            Some(token),
            None,
        )
        .await?;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, headers, body) = helpers::request_raw(
        &app,
        "GET",
        "/api/recipes/download_shopping_cart",
        Some(token),
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
        Some("text/plain; charset=utf-8")
    );
    assert_eq!(
        headers
            .get(header::CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok()),
        Some("attachment; filename=shoppingcart.txt")
    );

    let expected = "******************** Your shopping list ********************\r\n\
                    Flour (g) — 300\r\n\
                    Salt (pinch) — 3\r\n\
                    Sugar (g) — 50\r\n\
                    Thank you for using our site\r\n\
                    https://foodgram.example.org\r\n";
    assert_eq!(body, expected);

    Ok(())
}

#[tokio::test]
async fn download_of_an_empty_cart_is_rejected() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let app = helpers::setup(dir.child("db.sqlite3")).await?;
    let kitchen = seed_kitchen(&app).await?;
    let token = &kitchen.token;

    let uri = "/api/recipes/download_shopping_cart";

    let (status, value) = helpers::request(&app, "GET", uri, Some(token), None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["errors"], "Shopping cart is empty");

    // Emptying the cart brings the error back
    let recipe_uri = format!("/api/recipes/{}/shopping_cart", kitchen.pancakes);
    let (status, _) = helpers::request(&app, "POST", &recipe_uri, Some(token), None).await?;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _, _) = helpers::request_raw(&app, "GET", uri, Some(token)).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = helpers::request(&app, "DELETE", &recipe_uri, Some(token), None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, value) = helpers::request(&app, "GET", uri, Some(token), None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["errors"], "Shopping cart is empty");

    Ok(())
}

#[tokio::test]
async fn download_requires_credentials() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let app = helpers::setup(dir.child("db.sqlite3")).await?;

    let (status, value) =
        helpers::request(&app, "GET", "/api/recipes/download_shopping_cart", None, None).await?;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        value["detail"],
        "Authentication credentials were not provided"
    );

    Ok(())
}

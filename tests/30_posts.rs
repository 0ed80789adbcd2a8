mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

async fn create_post(
    server: &common::TestServer,
    uid: i64,
    title: &str,
    labels: &[&str],
) -> Result<reqwest::Response> {
    let client = reqwest::Client::new();
    Ok(client
        .post(format!("{}/api/posts", server.base_url))
        .json(&json!({
            "uid": uid,
            "title": title,
            "problem_content": "Settle this",
            "option_a_content": "A",
            "option_b_content": "B",
            "anonymous_flag": false,
            "labels": labels
        }))
        .send()
        .await?)
}

#[tokio::test]
async fn create_without_labels_yields_empty_link_set() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::db_ready(server).await? {
        eprintln!("skipping: database unavailable");
        return Ok(());
    }

    let uid = common::register_user(server, "poster_plain").await?;
    let res = create_post(server, uid, "Tabs or spaces?", &[]).await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["post"]["uid"].as_i64(), Some(uid));
    assert!(body["data"]["post"]["pid"].as_i64().is_some());
    assert_eq!(body["data"]["label_ids"].as_array().map(Vec::len), Some(0));

    // Served back with an empty labels array
    let pid = body["data"]["post"]["pid"].as_i64().unwrap();
    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/api/posts/{}", server.base_url, pid))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["labels"].as_array().map(Vec::len), Some(0));
    Ok(())
}

#[tokio::test]
async fn unknown_label_fails_and_leaves_no_post_behind() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::db_ready(server).await? {
        eprintln!("skipping: database unavailable");
        return Ok(());
    }

    let uid = common::register_user(server, "poster_bogus").await?;
    let res = create_post(server, uid, "Doomed poll", &["no_such_label_zzz"]).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = res.json::<serde_json::Value>().await?;
    assert!(
        body["message"]
            .as_str()
            .is_some_and(|m| m.contains("no_such_label_zzz")),
        "error should name the offending label: {}",
        body
    );

    // The post insert rolled back with the rest of the unit of work, so this
    // author still has no posts at all
    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/api/posts/user/{}", server.base_url, uid))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn duplicate_label_names_resolve_to_duplicate_ids() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::db_ready(server).await? {
        eprintln!("skipping: database unavailable");
        return Ok(());
    }

    let uid = common::register_user(server, "poster_dupe").await?;
    let res = create_post(server, uid, "Dupes", &["sports", "sports"]).await?;
    if res.status() == StatusCode::BAD_REQUEST {
        eprintln!("skipping: label seed from sql/schema.sql not loaded");
        return Ok(());
    }
    assert_eq!(res.status(), StatusCode::CREATED);

    let body = res.json::<serde_json::Value>().await?;
    let ids = body["data"]["label_ids"].as_array().cloned().unwrap_or_default();
    assert_eq!(ids.len(), 2, "resolver preserves duplicates: {}", body);
    assert_eq!(ids[0], ids[1]);

    // The persisted link set is still a set: one "sports" on the post
    let pid = body["data"]["post"]["pid"].as_i64().unwrap();
    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/api/posts/{}", server.base_url, pid))
        .send()
        .await?;
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["labels"], json!(["sports"]));
    Ok(())
}

#[tokio::test]
async fn labeled_post_serves_its_full_label_set() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::db_ready(server).await? {
        eprintln!("skipping: database unavailable");
        return Ok(());
    }

    let uid = common::register_user(server, "poster_labeled").await?;
    let res = create_post(server, uid, "Labeled", &["sports", "food"]).await?;
    if res.status() == StatusCode::BAD_REQUEST {
        eprintln!("skipping: label seed from sql/schema.sql not loaded");
        return Ok(());
    }
    assert_eq!(res.status(), StatusCode::CREATED);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["label_ids"].as_array().map(Vec::len), Some(2));

    let pid = body["data"]["post"]["pid"].as_i64().unwrap();
    let client = reqwest::Client::new();
    let res = client
        .get(format!("{}/api/posts/{}", server.base_url, pid))
        .send()
        .await?;
    let body = res.json::<serde_json::Value>().await?;
    let mut labels: Vec<String> = body["data"]["labels"]
        .as_array()
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .filter_map(|v| v.as_str().map(String::from))
        .collect();
    labels.sort();
    assert_eq!(labels, vec!["food".to_string(), "sports".to_string()]);
    Ok(())
}

#[tokio::test]
async fn concurrent_creations_stay_disjoint() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::db_ready(server).await? {
        eprintln!("skipping: database unavailable");
        return Ok(());
    }

    let uid_a = common::register_user(server, "poster_con_a").await?;
    let uid_b = common::register_user(server, "poster_con_b").await?;

    let (res_a, res_b) = tokio::join!(
        create_post(server, uid_a, "Concurrent A", &["life"]),
        create_post(server, uid_b, "Concurrent B", &["work"]),
    );
    let (res_a, res_b) = (res_a?, res_b?);
    if res_a.status() == StatusCode::BAD_REQUEST || res_b.status() == StatusCode::BAD_REQUEST {
        eprintln!("skipping: label seed from sql/schema.sql not loaded");
        return Ok(());
    }
    assert_eq!(res_a.status(), StatusCode::CREATED);
    assert_eq!(res_b.status(), StatusCode::CREATED);

    let body_a = res_a.json::<serde_json::Value>().await?;
    let body_b = res_b.json::<serde_json::Value>().await?;
    let pid_a = body_a["data"]["post"]["pid"].as_i64().unwrap();
    let pid_b = body_b["data"]["post"]["pid"].as_i64().unwrap();
    assert_ne!(pid_a, pid_b);

    // Each post sees only its own links
    let client = reqwest::Client::new();
    let shown_a = client
        .get(format!("{}/api/posts/{}", server.base_url, pid_a))
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    let shown_b = client
        .get(format!("{}/api/posts/{}", server.base_url, pid_b))
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    assert_eq!(shown_a["data"]["labels"], json!(["life"]));
    assert_eq!(shown_b["data"]["labels"], json!(["work"]));
    Ok(())
}

#[tokio::test]
async fn blank_title_is_rejected_before_any_insert() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::db_ready(server).await? {
        eprintln!("skipping: database unavailable");
        return Ok(());
    }

    let uid = common::register_user(server, "poster_blank").await?;
    let res = create_post(server, uid, "   ", &[]).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    Ok(())
}

#[tokio::test]
async fn deleting_a_post_removes_it() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::db_ready(server).await? {
        eprintln!("skipping: database unavailable");
        return Ok(());
    }

    let uid = common::register_user(server, "poster_delete").await?;
    let res = create_post(server, uid, "Short lived", &[]).await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = res.json::<serde_json::Value>().await?;
    let pid = body["data"]["post"]["pid"].as_i64().unwrap();

    let client = reqwest::Client::new();
    let res = client
        .delete(format!("{}/api/posts/{}", server.base_url, pid))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(format!("{}/api/posts/{}", server.base_url, pid))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

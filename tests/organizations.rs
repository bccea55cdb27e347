mod common;

mod organizations {
    mod create {
        use crate::common::*;
        use http::StatusCode;
        use serde_json::json;
        use tower::ServiceExt;

        #[tokio::test]
        async fn creator_becomes_owner() {
            let pool = test_pool().await;
            let app = test_router(pool.clone());
            create_user(&pool, "founder@example.com", "Password123").await;

            let creds = login(&app, "founder@example.com", "Password123").await;
            let mut request = json_request("POST", "/organizations", json!({ "name": "Acme" }));
            request
                .headers_mut()
                .insert("cookie", creds.cookie.parse().unwrap());
            let response = app.oneshot(request).await.unwrap();

            assert_eq!(response.status(), StatusCode::CREATED);
            let body = response_json(response).await;
            let org_id = body["data"]["organization_id"].as_str().unwrap().to_string();
            assert!(body["data"]["slug"].as_str().unwrap().contains("-org-"));

            let role: String = sqlx::query_scalar(
                "SELECT role FROM members WHERE organization_id = ? AND email = ?",
            )
            .bind(&org_id)
            .bind("founder@example.com")
            .fetch_one(&pool)
            .await
            .unwrap();
            assert_eq!(role, "owner");
        }

        #[tokio::test]
        async fn requires_authentication() {
            let pool = test_pool().await;
            let app = test_router(pool);

            let request = json_request("POST", "/organizations", json!({ "name": "Acme" }));
            let response = app.oneshot(request).await.unwrap();

            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }

        #[tokio::test]
        async fn empty_name_is_rejected() {
            let pool = test_pool().await;
            let app = test_router(pool.clone());
            create_user(&pool, "founder@example.com", "Password123").await;

            let creds = login(&app, "founder@example.com", "Password123").await;
            let mut request = json_request("POST", "/organizations", json!({ "name": "" }));
            request
                .headers_mut()
                .insert("cookie", creds.cookie.parse().unwrap());
            let response = app.oneshot(request).await.unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
    }

    mod fetch {
        use crate::common::*;
        use axum::body::Body;
        use http::StatusCode;
        use tower::ServiceExt;

        #[tokio::test]
        async fn by_id_returns_the_workspace() {
            let pool = test_pool().await;
            let app = test_router(pool.clone());
            create_user(&pool, "owner@example.com", "Password123").await;
            let (org_id, slug) = seed_org(&pool, "fetchable", "owner@example.com").await;

            let creds = login(&app, "owner@example.com", "Password123").await;
            let request = http::Request::builder()
                .uri(format!("/organizations/{}", org_id))
                .header("cookie", &creds.cookie)
                .body(Body::empty())
                .unwrap();
            let response = app.oneshot(request).await.unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            let body = response_json(response).await;
            assert_eq!(body["data"]["id"], org_id);
            assert_eq!(body["data"]["slug"], slug);
            assert_eq!(body["data"]["name"], "fetchable");
        }
    }

    mod delete {
        use crate::common::*;
        use axum::body::Body;
        use http::StatusCode;
        use parley::app::domain::OrganizationRole;
        use tower::ServiceExt;

        #[tokio::test]
        async fn owner_deletes_workspace_and_memberships() {
            let pool = test_pool().await;
            let app = test_router(pool.clone());
            create_user(&pool, "owner@example.com", "Password123").await;
            create_user(&pool, "member@example.com", "Password123").await;
            let (org_id, _) = seed_org(&pool, "doomed", "owner@example.com").await;
            seed_member(&pool, &org_id, "member@example.com", OrganizationRole::Member).await;

            let creds = login(&app, "owner@example.com", "Password123").await;
            let request = http::Request::builder()
                .method("DELETE")
                .uri(format!("/organizations/{}", org_id))
                .header("cookie", &creds.cookie)
                .body(Body::empty())
                .unwrap();
            let response = app.oneshot(request).await.unwrap();

            assert_eq!(response.status(), StatusCode::OK);

            let orgs: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM organizations WHERE id = ?")
                .bind(&org_id)
                .fetch_one(&pool)
                .await
                .unwrap();
            assert_eq!(orgs, 0);

            let members: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM members WHERE organization_id = ?")
                    .bind(&org_id)
                    .fetch_one(&pool)
                    .await
                    .unwrap();
            assert_eq!(members, 0);
        }

        #[tokio::test]
        async fn admin_cannot_delete() {
            let pool = test_pool().await;
            let app = test_router(pool.clone());
            create_user(&pool, "owner@example.com", "Password123").await;
            create_user(&pool, "admin@example.com", "Password123").await;
            let (org_id, _) = seed_org(&pool, "sticky", "owner@example.com").await;
            seed_member(&pool, &org_id, "admin@example.com", OrganizationRole::Admin).await;

            let creds = login(&app, "admin@example.com", "Password123").await;
            let request = http::Request::builder()
                .method("DELETE")
                .uri(format!("/organizations/{}", org_id))
                .header("cookie", &creds.cookie)
                .body(Body::empty())
                .unwrap();
            let response = app.oneshot(request).await.unwrap();

            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }
    }

    mod transfer {
        use crate::common::*;
        use http::StatusCode;
        use parley::app::domain::OrganizationRole;
        use serde_json::json;
        use tower::ServiceExt;

        async fn role_of(pool: &sqlx::SqlitePool, org_id: &str, email: &str) -> String {
            sqlx::query_scalar("SELECT role FROM members WHERE organization_id = ? AND email = ?")
                .bind(org_id)
                .bind(email)
                .fetch_one(pool)
                .await
                .unwrap()
        }

        #[tokio::test]
        async fn promotes_new_owner_and_demotes_former() {
            let pool = test_pool().await;
            let app = test_router(pool.clone());
            create_user(&pool, "owner@example.com", "Password123").await;
            create_user(&pool, "heir@example.com", "Password123").await;
            let (org_id, _) = seed_org(&pool, "handover", "owner@example.com").await;
            seed_member(&pool, &org_id, "heir@example.com", OrganizationRole::Member).await;

            let creds = login(&app, "owner@example.com", "Password123").await;
            let mut request = json_request(
                "POST",
                &format!("/organizations/{}/transfer-ownership", org_id),
                json!({ "email": "heir@example.com" }),
            );
            request
                .headers_mut()
                .insert("cookie", creds.cookie.parse().unwrap());
            let response = app.oneshot(request).await.unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(role_of(&pool, &org_id, "heir@example.com").await, "owner");
            assert_eq!(role_of(&pool, &org_id, "owner@example.com").await, "admin");
        }

        #[tokio::test]
        async fn target_must_already_be_a_member() {
            let pool = test_pool().await;
            let app = test_router(pool.clone());
            create_user(&pool, "owner@example.com", "Password123").await;
            create_user(&pool, "stranger@example.com", "Password123").await;
            let (org_id, _) = seed_org(&pool, "handover", "owner@example.com").await;

            let creds = login(&app, "owner@example.com", "Password123").await;
            let mut request = json_request(
                "POST",
                &format!("/organizations/{}/transfer-ownership", org_id),
                json!({ "email": "stranger@example.com" }),
            );
            request
                .headers_mut()
                .insert("cookie", creds.cookie.parse().unwrap());
            let response = app.oneshot(request).await.unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let body = response_json(response).await;
            assert_eq!(body["error"], "user is not a member of this workspace");
        }

        #[tokio::test]
        async fn transfer_to_current_owner_is_rejected() {
            let pool = test_pool().await;
            let app = test_router(pool.clone());
            create_user(&pool, "owner@example.com", "Password123").await;
            let (org_id, _) = seed_org(&pool, "handover", "owner@example.com").await;

            let creds = login(&app, "owner@example.com", "Password123").await;
            let mut request = json_request(
                "POST",
                &format!("/organizations/{}/transfer-ownership", org_id),
                json!({ "email": "owner@example.com" }),
            );
            request
                .headers_mut()
                .insert("cookie", creds.cookie.parse().unwrap());
            let response = app.oneshot(request).await.unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let body = response_json(response).await;
            assert_eq!(body["error"], "this member already owns this organization");
        }

        #[tokio::test]
        async fn only_the_owner_may_transfer() {
            let pool = test_pool().await;
            let app = test_router(pool.clone());
            create_user(&pool, "owner@example.com", "Password123").await;
            create_user(&pool, "admin@example.com", "Password123").await;
            let (org_id, _) = seed_org(&pool, "handover", "owner@example.com").await;
            seed_member(&pool, &org_id, "admin@example.com", OrganizationRole::Admin).await;

            let creds = login(&app, "admin@example.com", "Password123").await;
            let mut request = json_request(
                "POST",
                &format!("/organizations/{}/transfer-ownership", org_id),
                json!({ "email": "admin@example.com" }),
            );
            request
                .headers_mut()
                .insert("cookie", creds.cookie.parse().unwrap());
            let response = app.oneshot(request).await.unwrap();

            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }
    }

    mod billing {
        use crate::common::*;
        use http::StatusCode;
        use serde_json::json;
        use tower::ServiceExt;

        #[tokio::test]
        async fn settings_payload_is_stored_verbatim() {
            let pool = test_pool().await;
            let app = test_router(pool.clone());
            create_user(&pool, "owner@example.com", "Password123").await;
            let (org_id, _) = seed_org(&pool, "billable", "owner@example.com").await;

            let creds = login(&app, "owner@example.com", "Password123").await;
            let payload = json!({ "plan": "pro", "seats": 12 });
            let mut request = json_request(
                "PATCH",
                &format!("/organizations/{}/billing/settings", org_id),
                payload.clone(),
            );
            request
                .headers_mut()
                .insert("cookie", creds.cookie.parse().unwrap());
            let response = app.oneshot(request).await.unwrap();

            assert_eq!(response.status(), StatusCode::OK);

            let stored: String = sqlx::query_scalar(
                "SELECT billing_setting FROM organizations WHERE id = ?",
            )
            .bind(&org_id)
            .fetch_one(&pool)
            .await
            .unwrap();
            let stored: serde_json::Value = serde_json::from_str(&stored).unwrap();
            assert_eq!(stored, payload);
        }

        #[tokio::test]
        async fn contact_and_settings_are_independent_columns() {
            let pool = test_pool().await;
            let app = test_router(pool.clone());
            create_user(&pool, "owner@example.com", "Password123").await;
            let (org_id, _) = seed_org(&pool, "billable", "owner@example.com").await;

            let creds = login(&app, "owner@example.com", "Password123").await;
            let mut request = json_request(
                "PATCH",
                &format!("/organizations/{}/billing/contact", org_id),
                json!({ "name": "Pat", "email": "billing@example.com" }),
            );
            request
                .headers_mut()
                .insert("cookie", creds.cookie.parse().unwrap());
            let response = app.oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);

            let setting: Option<String> = sqlx::query_scalar(
                "SELECT billing_setting FROM organizations WHERE id = ?",
            )
            .bind(&org_id)
            .fetch_one(&pool)
            .await
            .unwrap();
            assert!(setting.is_none());
        }

        #[tokio::test]
        async fn non_object_payload_is_rejected() {
            let pool = test_pool().await;
            let app = test_router(pool.clone());
            create_user(&pool, "owner@example.com", "Password123").await;
            let (org_id, _) = seed_org(&pool, "billable", "owner@example.com").await;

            let creds = login(&app, "owner@example.com", "Password123").await;
            let mut request = json_request(
                "PATCH",
                &format!("/organizations/{}/billing/settings", org_id),
                json!("just a string"),
            );
            request
                .headers_mut()
                .insert("cookie", creds.cookie.parse().unwrap());
            let response = app.oneshot(request).await.unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
    }

    mod member_roles {
        use crate::common::*;
        use http::StatusCode;
        use parley::app::domain::OrganizationRole;
        use serde_json::json;
        use tower::ServiceExt;

        async fn member_id(pool: &sqlx::SqlitePool, org_id: &str, email: &str) -> String {
            sqlx::query_scalar("SELECT id FROM members WHERE organization_id = ? AND email = ?")
                .bind(org_id)
                .bind(email)
                .fetch_one(pool)
                .await
                .unwrap()
        }

        #[tokio::test]
        async fn admin_changes_a_member_role() {
            let pool = test_pool().await;
            let app = test_router(pool.clone());
            create_user(&pool, "owner@example.com", "Password123").await;
            create_user(&pool, "guest@example.com", "Password123").await;
            let (org_id, _) = seed_org(&pool, "roleful", "owner@example.com").await;
            seed_member(&pool, &org_id, "guest@example.com", OrganizationRole::Guest).await;
            let target = member_id(&pool, &org_id, "guest@example.com").await;

            let creds = login(&app, "owner@example.com", "Password123").await;
            let mut request = json_request(
                "PATCH",
                &format!("/organizations/{}/members/{}", org_id, target),
                json!({ "role": "member" }),
            );
            request
                .headers_mut()
                .insert("cookie", creds.cookie.parse().unwrap());
            let response = app.oneshot(request).await.unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            let role: String = sqlx::query_scalar("SELECT role FROM members WHERE id = ?")
                .bind(&target)
                .fetch_one(&pool)
                .await
                .unwrap();
            assert_eq!(role, "member");
        }

        #[tokio::test]
        async fn owner_role_is_not_assignable_here() {
            let pool = test_pool().await;
            let app = test_router(pool.clone());
            create_user(&pool, "owner@example.com", "Password123").await;
            create_user(&pool, "member@example.com", "Password123").await;
            let (org_id, _) = seed_org(&pool, "roleful", "owner@example.com").await;
            seed_member(&pool, &org_id, "member@example.com", OrganizationRole::Member).await;
            let target = member_id(&pool, &org_id, "member@example.com").await;

            let creds = login(&app, "owner@example.com", "Password123").await;
            let mut request = json_request(
                "PATCH",
                &format!("/organizations/{}/members/{}", org_id, target),
                json!({ "role": "owner" }),
            );
            request
                .headers_mut()
                .insert("cookie", creds.cookie.parse().unwrap());
            let response = app.oneshot(request).await.unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let body = response_json(response).await;
            assert_eq!(body["error"], "ownership is assigned via transfer-ownership");
        }

        #[tokio::test]
        async fn current_owner_cannot_be_demoted_here() {
            // Only transfer-ownership moves the owner role, in either
            // direction; demoting the owner's row directly would leave the
            // workspace with no one able to transfer or delete it.
            let pool = test_pool().await;
            let app = test_router(pool.clone());
            create_user(&pool, "owner@example.com", "Password123").await;
            create_user(&pool, "admin@example.com", "Password123").await;
            let (org_id, _) = seed_org(&pool, "roleful", "owner@example.com").await;
            seed_member(&pool, &org_id, "admin@example.com", OrganizationRole::Admin).await;
            let target = member_id(&pool, &org_id, "owner@example.com").await;

            let creds = login(&app, "admin@example.com", "Password123").await;
            let mut request = json_request(
                "PATCH",
                &format!("/organizations/{}/members/{}", org_id, target),
                json!({ "role": "guest" }),
            );
            request
                .headers_mut()
                .insert("cookie", creds.cookie.parse().unwrap());
            let response = app.oneshot(request).await.unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let body = response_json(response).await;
            assert_eq!(body["error"], "ownership is relinquished via transfer-ownership");

            let role: String = sqlx::query_scalar("SELECT role FROM members WHERE id = ?")
                .bind(&target)
                .fetch_one(&pool)
                .await
                .unwrap();
            assert_eq!(role, "owner");
        }

        #[tokio::test]
        async fn member_id_is_scoped_to_the_workspace() {
            // A valid member id from another workspace must not be reachable
            // through this workspace's route.
            let pool = test_pool().await;
            let app = test_router(pool.clone());
            create_user(&pool, "owner@example.com", "Password123").await;
            create_user(&pool, "other@example.com", "Password123").await;
            let (org_a, _) = seed_org(&pool, "alpha team", "owner@example.com").await;
            let (org_b, _) = seed_org(&pool, "beta team", "other@example.com").await;
            let foreign = member_id(&pool, &org_b, "other@example.com").await;

            let creds = login(&app, "owner@example.com", "Password123").await;
            let mut request = json_request(
                "PATCH",
                &format!("/organizations/{}/members/{}", org_a, foreign),
                json!({ "role": "guest" }),
            );
            request
                .headers_mut()
                .insert("cookie", creds.cookie.parse().unwrap());
            let response = app.oneshot(request).await.unwrap();

            assert_eq!(response.status(), StatusCode::NOT_FOUND);
            let role: String = sqlx::query_scalar("SELECT role FROM members WHERE id = ?")
                .bind(&foreign)
                .fetch_one(&pool)
                .await
                .unwrap();
            assert_eq!(role, "owner");
        }
    }
}

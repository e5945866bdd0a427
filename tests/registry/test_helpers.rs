//! Shared fixtures for registry integration tests.

use std::sync::{Arc, Mutex};

use actix_web::{App, dev::ServiceResponse, test, web};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use preservation_registry::auth::AdminKey;
use preservation_registry::config::{Config, DatabaseSettings, Environment};
use preservation_registry::db::DbPool;
use preservation_registry::entity::{
    deletion_request, generic_file, institution, intellectual_object, premis_event, user, work_item,
};
use preservation_registry::error::AppResult;
use preservation_registry::models::{
    Access, CreateGenericFileRequest, CreateInstitutionRequest, CreateIntellectualObjectRequest,
    CreatePremisEventRequest, CreateUserRequest, CreateWorkItemRequest, InstitutionType, Role,
    StorageOption,
};
use preservation_registry::services::{QueueClient, token};

/// Admin key used in tests.
pub const TEST_ADMIN_KEY: &str = "test-admin-key-for-registry";

/// Base URL placed in review links.
pub const TEST_BASE_URL: &str = "http://registry.test/api/v1";

/// Queue that remembers what was published instead of sending it.
#[derive(Default)]
pub struct RecordingQueue {
    published: Mutex<Vec<(String, i32)>>,
}

impl RecordingQueue {
    pub fn published(&self) -> Vec<(String, i32)> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueueClient for RecordingQueue {
    async fn enqueue(&self, topic: &str, work_item_id: i32) -> AppResult<()> {
        self.published
            .lock()
            .unwrap()
            .push((topic.to_string(), work_item_id));
        Ok(())
    }
}

/// Fresh in-memory database with all migrations applied.
///
/// A single connection keeps every query on the same in-memory database.
pub async fn create_test_pool() -> DbPool {
    let pool = DbPool::new(&DatabaseSettings {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
    })
    .await
    .expect("Failed to open in-memory database");
    pool.run_migrations()
        .await
        .expect("Failed to run migrations");
    pool
}

pub fn test_config() -> Config {
    Config {
        environment: Environment::Development,
        host: "127.0.0.1".to_string(),
        port: 0,
        database: DatabaseSettings {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
        },
        admin_key: Some(TEST_ADMIN_KEY.to_string()),
        nsq_url: "http://nsq.test:4151".to_string(),
        base_url: TEST_BASE_URL.to_string(),
    }
}

/// Registry app wired like `main`, with the recording queue.
pub async fn create_test_app(
    pool: &DbPool,
    queue: Arc<RecordingQueue>,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = ServiceResponse,
    Error = actix_web::Error,
> {
    let queue: Arc<dyn QueueClient> = queue;
    test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(AdminKey::new(Some(TEST_ADMIN_KEY.to_string()))))
            .app_data(web::Data::from(queue))
            .app_data(web::Data::new(test_config()))
            .service(
                web::scope("/api/v1").configure(preservation_registry::api::configure_routes),
            ),
    )
    .await
}

/// Short random suffix for unique identifiers.
pub fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, &Uuid::new_v4().simple().to_string()[..8])
}

pub async fn create_institution(pool: &DbPool, identifier: &str) -> institution::Model {
    pool.insert_institution(
        CreateInstitutionRequest {
            name: format!("Institution {}", identifier),
            identifier: identifier.to_string(),
            institution_type: InstitutionType::MemberInstitution,
            member_institution_id: None,
            spot_restore_frequency: 0,
        }
        .into_model(Utc::now()),
    )
    .await
    .expect("insert institution")
}

pub async fn create_user(
    pool: &DbPool,
    inst: &institution::Model,
    role: Role,
    name: &str,
) -> user::Model {
    pool.insert_user(
        CreateUserRequest {
            name: name.to_string(),
            email: format!("{}@{}", name.to_lowercase(), inst.identifier),
            role,
            institution_id: inst.id,
        }
        .into_model(Utc::now()),
    )
    .await
    .expect("insert user")
}

/// An institution with one institutional admin and one depositor.
pub struct Depositor {
    pub institution: institution::Model,
    pub admin: user::Model,
    pub user: user::Model,
}

pub async fn create_depositor(pool: &DbPool) -> Depositor {
    let institution = create_institution(pool, &format!("{}.edu", unique("inst"))).await;
    let admin = create_user(pool, &institution, Role::InstitutionalAdmin, "Admin").await;
    let user = create_user(pool, &institution, Role::InstitutionalUser, "User").await;
    Depositor {
        institution,
        admin,
        user,
    }
}

pub async fn create_object(pool: &DbPool, inst: &institution::Model) -> intellectual_object::Model {
    let bag = unique("bag");
    pool.insert_intellectual_object(
        CreateIntellectualObjectRequest {
            title: format!("Photographs {}", bag),
            description: None,
            identifier: format!("{}/{}", inst.identifier, bag),
            alt_identifier: None,
            access: Access::Institution,
            bag_name: format!("{}.tar", bag),
            institution_id: inst.id,
            etag: None,
            bag_group_identifier: None,
            storage_option: StorageOption::Standard,
            bagit_profile_identifier: "https://example.org/bagit-profile.json".to_string(),
            source_organization: None,
            internal_sender_identifier: None,
            internal_sender_description: None,
        }
        .into_model(Utc::now()),
    )
    .await
    .expect("insert object")
}

pub async fn create_file(pool: &DbPool, obj: &intellectual_object::Model) -> generic_file::Model {
    pool.insert_generic_file(
        CreateGenericFileRequest {
            file_format: "image/jpeg".to_string(),
            size: 4096,
            identifier: format!("{}/data/{}.jpg", obj.identifier, unique("img")),
            intellectual_object_id: obj.id,
            institution_id: obj.institution_id,
            storage_option: StorageOption::Standard,
            uuid: None,
        }
        .into_model(Utc::now()),
    )
    .await
    .expect("insert file")
}

pub fn event_request(
    event_type: &str,
    obj: &intellectual_object::Model,
    file_id: Option<i32>,
) -> CreatePremisEventRequest {
    CreatePremisEventRequest {
        identifier: None,
        event_type: event_type.to_string(),
        date_time: Utc::now(),
        detail: format!("{} detail", event_type),
        outcome: "Success".to_string(),
        outcome_detail: "md5:12345678901234567890123456789012".to_string(),
        outcome_information: format!("{} completed", event_type),
        object: "registry tests".to_string(),
        agent: "https://example.org/agent".to_string(),
        intellectual_object_id: obj.id,
        generic_file_id: file_id,
        institution_id: obj.institution_id,
    }
}

/// Store an event created at `at`.
pub async fn record_event(
    pool: &DbPool,
    event_type: &str,
    obj: &intellectual_object::Model,
    file_id: Option<i32>,
    at: DateTime<Utc>,
) -> premis_event::Model {
    pool.save_premis_event(event_request(event_type, obj, file_id).into_model(at))
        .await
        .expect("insert event")
}

pub fn work_item_request(
    obj: &intellectual_object::Model,
    action: &str,
    stage: &str,
    status: &str,
) -> CreateWorkItemRequest {
    CreateWorkItemRequest {
        name: obj.bag_name.clone(),
        etag: "0123456789abcdef0123456789abcdef".to_string(),
        institution_id: obj.institution_id,
        intellectual_object_id: Some(obj.id),
        generic_file_id: None,
        bucket: format!("aptrust.receiving.{}", obj.institution_id),
        user: "ingest@aptrust.org".to_string(),
        note: format!("{} {}", action, stage),
        action: action.to_string(),
        stage: stage.to_string(),
        status: status.to_string(),
        outcome: String::new(),
        bag_date: Utc::now() - Duration::days(1),
        size: 8192,
    }
}

pub async fn save_work_item(
    pool: &DbPool,
    obj: &intellectual_object::Model,
    action: &str,
    stage: &str,
    status: &str,
) -> work_item::Model {
    pool.save_work_item(work_item_request(obj, action, stage, status).into_model(Utc::now()))
        .await
        .expect("save work item")
}

/// An object that finished ingest: successful Ingest work item plus an
/// ingestion event recorded an hour ago.
pub async fn create_ingested_object(
    pool: &DbPool,
    inst: &institution::Model,
) -> intellectual_object::Model {
    let obj = create_object(pool, inst).await;
    save_work_item(pool, &obj, "Ingest", "Cleanup", "Success").await;
    record_event(pool, "ingestion", &obj, None, Utc::now() - Duration::hours(1)).await;
    obj
}

/// Pull the confirmation token out of a review link in an alert body.
pub fn token_from_alert(content: &str) -> String {
    let start = content.find("token=").expect("alert has a review link") + "token=".len();
    content[start..]
        .split(|c: char| c.is_whitespace())
        .next()
        .unwrap_or_default()
        .trim_end_matches('.')
        .to_string()
}

/// A pending deletion request from the depositor's user, not yet stored.
pub fn unconfirmed_request(depositor: &Depositor) -> deletion_request::Model {
    deletion_request::Model {
        id: 0,
        institution_id: depositor.institution.id,
        requested_by_id: depositor.user.id,
        requested_at: Utc::now(),
        encrypted_confirmation_token: token::issue().unwrap().encrypted,
        confirmed_by_id: None,
        confirmed_at: None,
        cancelled_by_id: None,
        cancelled_at: None,
        work_item_id: None,
    }
}

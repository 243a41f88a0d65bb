//! Full generation flow against the real adapters.

use std::path::{Path, PathBuf};

use molgen_adapters::{HandlebarsRenderer, LocalFilesystem, MemoryFilesystem};
use molgen_core::{
    application::{ApplicationError, GenerationService},
    domain::{RawProjectConfig, RawServiceConfig},
    error::MolgenError,
};
use tempfile::TempDir;

fn shop_config() -> RawProjectConfig {
    serde_json::from_str(
        r#"{
            "projectName": "My Shop",
            "database": "mongodb",
            "transporter": "nats",
            "plugins": ["traefik", "prometheus"]
        }"#,
    )
    .unwrap()
}

fn workspace_templates() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../templates")
}

/// A memory filesystem holding a minimal template root at `/tpl`.
fn memory_with_templates() -> MemoryFilesystem {
    MemoryFilesystem::new()
        .with_file("/tpl/base/src/config/routes.config.js", "module.exports = {\n  \"routes\": []\n}\n")
        .with_file("/tpl/base/src/mixins/db.mixin.js", "// mixin")
        .with_file("/tpl/README.hbs", "# {{projectName}}\n")
        .with_file("/tpl/config/prometheus.hbs", "job: {{projectNameSanitized}}\n")
        .with_file("/tpl/service.hbs", "// {{serviceName}}\n")
        .with_file("/tpl/service-crud.hbs", "// crud {{serviceName}}\n")
        .with_file("/tpl/model.hbs", "// model {{modelName}}\n")
        .with_dir("/out")
}

fn memory_service(fs: &MemoryFilesystem) -> GenerationService {
    GenerationService::new(
        Box::new(fs.clone()),
        Box::new(HandlebarsRenderer::new()),
        "/tpl",
    )
}

#[tokio::test]
async fn init_writes_every_artifact() {
    let fs = memory_with_templates();
    let report = memory_service(&fs)
        .init_project(shop_config(), Path::new("/out"), false)
        .await
        .unwrap();

    assert_eq!(report.project_dir, PathBuf::from("/out/my-shop"));
    for file in [
        "docker-compose.yml",
        ".env.example",
        ".env.dev",
        "package.json",
        "README.md",
        ".moleculer-gen/config.json",
        "docker/config/prometheus.yml",
        "docker/services/api-gateway.yaml",
        "docker/services/mongodb.yaml",
        "docker/services/nats.yaml",
        "docker/services/traefik.yaml",
        "docker/services/prometheus.yaml",
        "src/config/routes.config.js",
        "src/mixins/db.mixin.js",
    ] {
        let path = Path::new("/out/my-shop").join(file);
        assert!(fs.read_file(&path).is_some(), "{} missing", path.display());
    }

    assert_eq!(
        fs.read_file("/out/my-shop/.env.example"),
        fs.read_file("/out/my-shop/.env.dev")
    );
    assert_eq!(
        fs.read_file("/out/my-shop/README.md").as_deref(),
        Some("# My Shop\n")
    );
    assert_eq!(
        fs.read_file("/out/my-shop/docker/config/prometheus.yml").as_deref(),
        Some("job: my-shop\n")
    );

    let compose: serde_yaml::Value =
        serde_yaml::from_str(&fs.read_file("/out/my-shop/docker-compose.yml").unwrap()).unwrap();
    for service in ["my-shop-api-gateway", "mongo", "nats", "traefik", "prometheus"] {
        assert!(compose["services"][service].is_mapping(), "{service} missing");
    }

    let state: serde_json::Value =
        serde_json::from_str(&fs.read_file("/out/my-shop/.moleculer-gen/config.json").unwrap())
            .unwrap();
    assert_eq!(state["projectNameSanitized"], "my-shop");
    assert_eq!(state["services"], serde_json::json!({}));
}

#[tokio::test]
async fn dry_run_leaves_the_filesystem_untouched() {
    let fs = memory_with_templates();
    let before = fs.list_files();

    let report = memory_service(&fs)
        .init_project(shop_config(), Path::new("/out"), true)
        .await
        .unwrap();

    assert!(report.dry_run);
    assert_eq!(fs.list_files(), before);
    assert!(!fs.is_dir("/out/my-shop"));
}

#[tokio::test]
async fn non_empty_target_is_rejected_untouched() {
    let fs = memory_with_templates().with_file("/out/my-shop/notes.txt", "mine");

    let err = memory_service(&fs)
        .init_project(shop_config(), Path::new("/out"), false)
        .await
        .unwrap_err();

    assert_eq!(err.code(), "DIRECTORY_NOT_EMPTY");
    let files: Vec<_> = fs
        .list_files()
        .into_iter()
        .filter(|p| p.starts_with("/out"))
        .collect();
    assert_eq!(files, [PathBuf::from("/out/my-shop/notes.txt")]);
}

#[tokio::test]
async fn one_failed_write_does_not_hide_the_others() {
    let fs = memory_with_templates().fail_writes_to("/out/my-shop/.env.dev");

    let err = memory_service(&fs)
        .init_project(shop_config(), Path::new("/out"), false)
        .await
        .unwrap_err();

    match err {
        MolgenError::Application(ApplicationError::PartialGeneration { written, failures }) => {
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].0, PathBuf::from("/out/my-shop/.env.dev"));
            assert!(written > 5);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(fs.read_file("/out/my-shop/.env.example").is_some());
    assert!(fs.read_file("/out/my-shop/docker-compose.yml").is_some());
}

#[tokio::test]
async fn add_service_extends_an_initialised_project() {
    let fs = memory_with_templates();
    let service = memory_service(&fs);
    service
        .init_project(shop_config(), Path::new("/out"), false)
        .await
        .unwrap();

    let raw: RawServiceConfig = serde_json::from_str(r#"{ "serviceName": "blog post" }"#).unwrap();
    let report = service
        .add_service(raw, Path::new("/out/my-shop"), false)
        .await
        .unwrap();
    assert_eq!(report.resolved.service_directory_name, "blog-posts");

    let root = Path::new("/out/my-shop");
    assert!(fs.is_dir(root.join("src/services/blog-posts/actions")));
    assert!(fs.is_dir(root.join("src/services/blog-posts/methods")));
    assert_eq!(
        fs.read_file(root.join("src/services/blog-posts/blog-posts.service.js"))
            .as_deref(),
        Some("// crud blogPost\n")
    );
    assert_eq!(
        fs.read_file(root.join("src/data/model/blog-post.model.js"))
            .as_deref(),
        Some("// model BlogPost\n")
    );

    let compose: serde_yaml::Value =
        serde_yaml::from_str(&fs.read_file(root.join("docker-compose.yml")).unwrap()).unwrap();
    assert!(compose["services"]["my-shop-blog-posts"].is_mapping());
    assert!(compose["services"]["mongo"].is_mapping());

    let routes = fs.read_file(root.join("src/config/routes.config.js")).unwrap();
    assert!(routes.contains("\"/api/v1/blog-posts\""));

    let state: serde_json::Value =
        serde_json::from_str(&fs.read_file(root.join(".moleculer-gen/config.json")).unwrap())
            .unwrap();
    assert_eq!(state["services"]["blogPost"]["modelName"], "BlogPost");
}

#[tokio::test]
async fn add_service_twice_into_the_same_directory_fails() {
    let fs = memory_with_templates();
    let service = memory_service(&fs);
    service
        .init_project(shop_config(), Path::new("/out"), false)
        .await
        .unwrap();

    let raw = || serde_json::from_str::<RawServiceConfig>(r#"{ "serviceName": "order" }"#).unwrap();
    service
        .add_service(raw(), Path::new("/out/my-shop"), false)
        .await
        .unwrap();
    let err = service
        .add_service(raw(), Path::new("/out/my-shop"), false)
        .await
        .unwrap_err();
    assert_eq!(err.code(), "DIRECTORY_NOT_EMPTY");
}

#[tokio::test]
async fn local_filesystem_with_bundled_templates() {
    let out = TempDir::new().unwrap();
    let service = GenerationService::new(
        Box::new(LocalFilesystem::new()),
        Box::new(HandlebarsRenderer::new()),
        workspace_templates(),
    );

    service
        .init_project(shop_config(), out.path(), false)
        .await
        .unwrap();

    let root = out.path().join("my-shop");
    assert!(root.join("src/services/api-gateway/api-gateway.service.js").is_file());
    assert!(root.join(".gitignore").is_file());
    let readme = std::fs::read_to_string(root.join("README.md")).unwrap();
    assert!(readme.starts_with("# My Shop"));
    assert!(readme.contains("Plugin: prometheus"));

    let raw: RawServiceConfig = serde_json::from_str(r#"{ "serviceName": "user" }"#).unwrap();
    service.add_service(raw, &root, false).await.unwrap();

    let model = std::fs::read_to_string(root.join("src/data/model/user.model.js")).unwrap();
    assert!(model.contains("mongoose.model('User', userSchema)"));
    let crud = std::fs::read_to_string(root.join("src/services/users/users.service.js")).unwrap();
    assert!(crud.contains("require('../../data/model/user.model.js')"));
}

#[tokio::test]
async fn two_services_are_recorded_in_order_and_routed() {
    let out = TempDir::new().unwrap();
    let service = GenerationService::new(
        Box::new(LocalFilesystem::new()),
        Box::new(HandlebarsRenderer::new()),
        workspace_templates(),
    );
    service
        .init_project(shop_config(), out.path(), false)
        .await
        .unwrap();
    let root = out.path().join("my-shop");

    for answers in [r#"{ "serviceName": "user" }"#, r#"{ "serviceName": "order" }"#] {
        let raw: RawServiceConfig = serde_json::from_str(answers).unwrap();
        service.add_service(raw, &root, false).await.unwrap();
    }

    let state = service.load_state(&root).await.unwrap();
    let names: Vec<_> = state.services.keys().map(String::as_str).collect();
    assert_eq!(names, ["user", "order"]);
    assert_eq!(state.services["order"].service_directory_name, "orders");

    let routes = std::fs::read_to_string(root.join("src/config/routes.config.js")).unwrap();
    let users = routes.find("\"/api/v1/users\"").expect("users route");
    let orders = routes.find("\"/api/v1/orders\"").expect("orders route");
    assert!(users < orders);

    let compose: serde_yaml::Value =
        serde_yaml::from_str(&std::fs::read_to_string(root.join("docker-compose.yml")).unwrap())
            .unwrap();
    assert!(compose["services"]["my-shop-users"].is_mapping());
    assert!(compose["services"]["my-shop-orders"].is_mapping());
    assert!(compose["services"]["my-shop-api-gateway"].is_mapping());
}

#[tokio::test]
async fn service_file_name_cannot_leave_the_project() {
    let fs = memory_with_templates();
    let service = memory_service(&fs);
    service
        .init_project(shop_config(), Path::new("/out"), false)
        .await
        .unwrap();
    let before = fs.list_files();

    let raw: RawServiceConfig =
        serde_json::from_str(r#"{ "serviceName": "user", "serviceFileName": "/etc/evil.js" }"#)
            .unwrap();
    let err = service
        .add_service(raw, Path::new("/out/my-shop"), false)
        .await
        .unwrap_err();

    assert_eq!(err.code(), "INVALID_CONFIG");
    assert!(fs.read_file("/etc/evil.js").is_none());
    assert_eq!(fs.list_files(), before);
}

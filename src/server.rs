//! HTTP boundary.
//!
//! Thirteen routes, one per gateway operation. Handlers decode the form
//! parameters, run the typed operation, and surface the outcome according
//! to the configured [`ErrorSurface`]: `legacy` flattens every fault into
//! the historical always-200 payload (callers inspect the body), `strict`
//! maps faults onto real status codes with a JSON error body.

use std::sync::Arc;

use axum::Router;
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::client::{DatanodeStatus, DfsConnector};
use crate::config::{ErrorSurface, GatewayConfig};
use crate::error::{GatewayError, Result};
use crate::gateway::Gateway;

/// Build the gateway router.
pub fn router(gateway: Arc<Gateway>) -> Router {
    Router::new()
        .route("/mkdir", post(mkdir))
        .route("/rmdir", post(rmdir))
        .route("/rename", post(rename))
        .route("/isexist", post(isexist))
        .route("/createFile", post(create_file))
        .route("/up", post(upload))
        .route("/bigUp", post(big_upload))
        .route("/down", post(download))
        .route("/bigDown", post(big_download))
        .route("/pathFiles", post(path_files))
        .route("/RPathFiles", post(recursive_path_files))
        .route("/fileBlock", post(file_block))
        .route("/dataNodeInfo", get(datanode_info))
        .with_state(gateway)
}

/// Bind and serve until interrupted.
pub async fn serve(config: GatewayConfig, connector: Arc<dyn DfsConnector>) -> Result<()> {
    let addr = config.bind_addr;
    let app = router(Arc::new(Gateway::new(config, connector)));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "gateway listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to install shutdown handler");
    }
}

fn status_for(err: &GatewayError) -> StatusCode {
    match err {
        GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
        GatewayError::AlreadyExists(_) => StatusCode::CONFLICT,
        GatewayError::NotAFile(_) | GatewayError::InvalidPath(_) => StatusCode::BAD_REQUEST,
        GatewayError::Unsupported => StatusCode::NOT_IMPLEMENTED,
        GatewayError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_GATEWAY,
    }
}

/// Flatten a fault according to the configured surface. `legacy` is the
/// payload the original gateway answered with under HTTP 200.
fn fault(surface: ErrorSurface, err: GatewayError, legacy: Response) -> Response {
    warn!(error = %err, "operation failed");
    match surface {
        ErrorSurface::Legacy => legacy,
        ErrorSurface::Strict => {
            (status_for(&err), Json(json!({ "error": err.to_string() }))).into_response()
        }
    }
}

/// Transfer endpoints answer `"bool,message"`; precondition faults keep
/// their dedicated messages in both surfacing modes.
fn transfer_reply(
    surface: ErrorSurface,
    result: Result<String>,
    ok_msg: &str,
    fail_msg: &str,
) -> Response {
    match result {
        Ok(_) => ok_msg.to_string().into_response(),
        Err(err) => {
            let message = match &err {
                GatewayError::AlreadyExists(_) => "false,该文件已存在!",
                GatewayError::NotFound(_) => "false,该文件不存在!",
                _ => fail_msg,
            };
            warn!(error = %err, "transfer failed");
            match surface {
                ErrorSurface::Legacy => message.to_string().into_response(),
                ErrorSurface::Strict => (status_for(&err), message.to_string()).into_response(),
            }
        }
    }
}

#[derive(Deserialize)]
struct PathParams {
    paths: String,
}

#[derive(Deserialize)]
struct ExistParams {
    paths: String,
    #[serde(default)]
    create: bool,
}

#[derive(Deserialize)]
struct RenameParams {
    oldname: String,
    newname: String,
}

#[derive(Deserialize)]
struct CreateFileParams {
    paths: String,
    #[serde(default)]
    contents: String,
}

#[derive(Deserialize)]
struct UploadParams {
    #[serde(rename = "localPath")]
    local_path: String,
    #[serde(rename = "hdfsPath")]
    hdfs_path: String,
    #[serde(rename = "delSrc", default)]
    del_src: bool,
    #[serde(default)]
    overwrite: bool,
}

#[derive(Deserialize)]
struct DownloadParams {
    #[serde(rename = "localPath")]
    local_path: String,
    #[serde(rename = "hdfsPath")]
    hdfs_path: String,
    #[serde(rename = "delSrc", default)]
    del_src: bool,
    #[serde(default)]
    windows: bool,
}

#[derive(Deserialize)]
struct StreamTransferParams {
    #[serde(rename = "localPath")]
    local_path: String,
    #[serde(rename = "hdfsPath")]
    hdfs_path: String,
}

async fn mkdir(State(gw): State<Arc<Gateway>>, Form(p): Form<PathParams>) -> Response {
    let shown = gw.display_path(&p.paths);
    match gw.mkdir(&p.paths).await {
        Ok(path) => format!("目录: {path} 创建成功!").into_response(),
        Err(err) => fault(
            gw.config().error_surface,
            err,
            format!("目录: {shown} 创建失败!").into_response(),
        ),
    }
}

async fn rmdir(State(gw): State<Arc<Gateway>>, Form(p): Form<PathParams>) -> Response {
    let shown = gw.display_path(&p.paths);
    match gw.rmdir(&p.paths).await {
        Ok(path) => format!("目录: {path} 删除成功!").into_response(),
        Err(err) => fault(
            gw.config().error_surface,
            err,
            format!("目录: {shown} 删除失败!").into_response(),
        ),
    }
}

async fn rename(State(gw): State<Arc<Gateway>>, Form(p): Form<RenameParams>) -> Response {
    match gw.rename(&p.oldname, &p.newname).await {
        Ok(flag) => flag.to_string().into_response(),
        Err(err) => fault(
            gw.config().error_surface,
            err,
            "false".to_string().into_response(),
        ),
    }
}

async fn isexist(State(gw): State<Arc<Gateway>>, Form(p): Form<ExistParams>) -> Response {
    match gw.ensure_dir(&p.paths, p.create).await {
        Ok(flag) => flag.to_string().into_response(),
        Err(err) => fault(
            gw.config().error_surface,
            err,
            "false".to_string().into_response(),
        ),
    }
}

async fn create_file(State(gw): State<Arc<Gateway>>, Form(p): Form<CreateFileParams>) -> Response {
    match gw.create_file(&p.paths, p.contents.as_bytes()).await {
        Ok(()) => "true".to_string().into_response(),
        Err(err) => fault(
            gw.config().error_surface,
            err,
            "false".to_string().into_response(),
        ),
    }
}

async fn upload(State(gw): State<Arc<Gateway>>, Form(p): Form<UploadParams>) -> Response {
    let result = gw
        .upload(&p.local_path, &p.hdfs_path, p.del_src, p.overwrite)
        .await;
    transfer_reply(
        gw.config().error_surface,
        result,
        "true,文件上传成功!",
        "false,文件上传失败!",
    )
}

async fn big_upload(
    State(gw): State<Arc<Gateway>>,
    Form(p): Form<StreamTransferParams>,
) -> Response {
    let result = gw.upload_streaming(&p.local_path, &p.hdfs_path).await;
    transfer_reply(
        gw.config().error_surface,
        result,
        "true,文件上传成功!",
        "false,文件上传失败!",
    )
}

async fn download(State(gw): State<Arc<Gateway>>, Form(p): Form<DownloadParams>) -> Response {
    let result = gw
        .download(&p.local_path, &p.hdfs_path, p.del_src, p.windows)
        .await;
    transfer_reply(
        gw.config().error_surface,
        result,
        "true,文件下载成功!",
        "false,文件下载失败!",
    )
}

async fn big_download(
    State(gw): State<Arc<Gateway>>,
    Form(p): Form<StreamTransferParams>,
) -> Response {
    let result = gw.download_streaming(&p.local_path, &p.hdfs_path).await;
    transfer_reply(
        gw.config().error_surface,
        result,
        "true,文件下载成功!",
        "false,文件下载失败!",
    )
}

async fn path_files(State(gw): State<Arc<Gateway>>, Form(p): Form<PathParams>) -> Response {
    match gw.list_children(&p.paths).await {
        Ok(paths) => Json(paths).into_response(),
        Err(err) => fault(
            gw.config().error_surface,
            err,
            Json(Vec::<String>::new()).into_response(),
        ),
    }
}

async fn recursive_path_files(
    State(gw): State<Arc<Gateway>>,
    Form(p): Form<PathParams>,
) -> Response {
    match gw.list_files_recursive(&p.paths).await {
        Ok(paths) => Json(paths).into_response(),
        Err(err) => fault(
            gw.config().error_surface,
            err,
            Json(Vec::<String>::new()).into_response(),
        ),
    }
}

async fn file_block(State(gw): State<Arc<Gateway>>, Form(p): Form<PathParams>) -> Response {
    match gw.file_blocks(&p.paths).await {
        Ok(blocks) => Json(blocks).into_response(),
        // The original answered a bare null when the lookup failed.
        Err(err) => fault(
            gw.config().error_surface,
            err,
            Json(Value::Null).into_response(),
        ),
    }
}

async fn datanode_info(State(gw): State<Arc<Gateway>>) -> Response {
    match gw.datanode_info().await {
        Ok(nodes) => Json(nodes).into_response(),
        Err(err) => fault(
            gw.config().error_surface,
            err,
            Json(Vec::<DatanodeStatus>::new()).into_response(),
        ),
    }
}

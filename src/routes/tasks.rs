use crate::{
    auth::AuthenticatedUserId,
    error::AppError,
    models::{TaskInput, TaskQuery, TaskUpdate},
    services::TaskService,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use uuid::Uuid;

/// Retrieves the authenticated user's tasks, oldest first.
///
/// ## Query Parameters:
/// - `completed` (optional): only tasks with this completion state.
///
/// ## Responses:
/// - `200 OK`: the matching tasks.
/// - `400 Bad Request`: `completed` is not `true` or `false`.
#[get("")]
pub async fn get_tasks(
    tasks: web::Data<TaskService>,
    query_params: web::Query<TaskQuery>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let owned = tasks.list(user_id.0, &query_params).await?;
    Ok(HttpResponse::Ok().json(owned))
}

/// Creates a new task for the authenticated user.
///
/// ## Request Body:
/// - `title`: required, at most 200 characters.
/// - `description`: required, at most 1000 characters.
///
/// ## Responses:
/// - `201 Created`: the new task, `completed` is `false`.
/// - `400 Bad Request`: missing title or description.
#[post("")]
pub async fn create_task(
    tasks: web::Data<TaskService>,
    task_data: web::Json<TaskInput>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let task = tasks.create(user_id.0, task_data.into_inner()).await?;
    Ok(HttpResponse::Created().json(task))
}

/// Retrieves one task owned by the authenticated user.
#[get("/{id}")]
pub async fn get_task(
    tasks: web::Data<TaskService>,
    task_id: web::Path<Uuid>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let task = tasks.get(user_id.0, task_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Updates the provided fields of a task.
///
/// ## Responses:
/// - `200 OK`: the updated task.
/// - `400 Bad Request`: a provided title or description is blank or too long.
/// - `404 Not Found`: no such task, or it belongs to another user.
#[put("/{id}")]
pub async fn update_task(
    tasks: web::Data<TaskService>,
    task_id: web::Path<Uuid>,
    task_data: web::Json<TaskUpdate>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let task = tasks
        .update(user_id.0, task_id.into_inner(), task_data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task by its ID.
///
/// ## Responses:
/// - `200 OK`: `{"message": "task deleted"}`.
/// - `404 Not Found`: no such task, or it belongs to another user.
#[delete("/{id}")]
pub async fn delete_task(
    tasks: web::Data<TaskService>,
    task_id: web::Path<Uuid>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    tasks.delete(user_id.0, task_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "task deleted" })))
}

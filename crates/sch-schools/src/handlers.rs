use super::*;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::Responder;
use actix_web::web;

pub async fn create(
    repo: web::Data<dyn SchoolRepository>,
    uploads: web::Data<Uploads>,
    req: HttpRequest,
    payload: web::Payload,
) -> Result<HttpResponse, Failure> {
    let mut submission = Submission::read(&req, payload, &uploads).await?;
    log::info!(
        "received request to add school: {:?}",
        submission.fields.get("name").unwrap_or_default()
    );
    let image = submission.image.as_ref().map(|i| i.name().to_string());
    match add(repo.get_ref(), &submission.fields, image).await {
        Ok(id) => Ok(HttpResponse::Created().json(Created::new(id))),
        Err(e) => {
            submission.discard().await;
            Err(e)
        }
    }
}

/// Validate, check for a duplicate, then insert.
/// The insert itself refuses a name taken in between.
async fn add(
    repo: &dyn SchoolRepository,
    fields: &Fields,
    image: Option<String>,
) -> Result<i32, Failure> {
    let ref school = NewSchool::from_fields(fields, image).ok_or(Failure::Missing)?;
    if repo
        .exists(&school.name)
        .await
        .map_err(Failure::storage("Failed to check for duplicate school"))?
    {
        return Err(Failure::Duplicate);
    }
    repo.insert(school)
        .await
        .map_err(Failure::storage("Failed to add school"))?
        .inspect(|id| log::info!("added school {} as {}", school.name, id))
        .ok_or(Failure::Duplicate)
}

pub async fn list(repo: web::Data<dyn SchoolRepository>) -> Result<HttpResponse, Failure> {
    log::info!("received request to fetch schools");
    let schools = repo
        .schools()
        .await
        .map_err(Failure::storage("Failed to fetch schools"))?;
    log::info!("fetched {} schools", schools.len());
    Ok(HttpResponse::Ok().json(schools))
}

/// Ids that do not parse as integers match no row.
pub async fn fetch(
    repo: web::Data<dyn SchoolRepository>,
    path: web::Path<String>,
) -> Result<HttpResponse, Failure> {
    let id = path.trim().parse::<i32>().map_err(|_| Failure::NotFound)?;
    repo.school(id)
        .await
        .map_err(Failure::storage("Failed to fetch school"))?
        .map(|school| HttpResponse::Ok().json(school))
        .ok_or(Failure::NotFound)
}

pub async fn health(repo: web::Data<dyn SchoolRepository>) -> impl Responder {
    match repo
        .ping()
        .await
        .inspect_err(|e| log::error!("health check failed: {}", e))
    {
        Ok(()) => HttpResponse::Ok().json(Health::ok()),
        Err(e) => HttpResponse::InternalServerError().json(Health::failed(e.to_string())),
    }
}

pub async fn missing() -> impl Responder {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "Not found" }))
}

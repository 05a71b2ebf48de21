use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::{
    ApiResponse, ErrorCode,
    users::requests::{NewStudent, RegisterStudentRequest},
};
use crate::services::error_response;
use crate::utils::validate::{validate_contact_number, validate_email, validate_name};

use super::AuthService;

pub async fn handle_register(
    service: &AuthService,
    register_request: RegisterStudentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 1. 校验表单字段
    if let Err(response) = validate_form(&register_request) {
        return Ok(response);
    }

    // 2. 解析专业代码
    let program_id = match register_request
        .program_code
        .as_deref()
        .map(str::trim)
        .filter(|code| !code.is_empty())
    {
        Some(code) => match storage.get_program_by_code(code).await {
            Ok(Some(program)) => Some(program.id),
            Ok(None) => {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::ProgramNotFound,
                    format!("Program {code} does not exist"),
                )));
            }
            Err(e) => return Ok(error_response(e, "Registration failed")),
        },
        None => None,
    };

    // 3. 创建用户与学生资料
    let new_student = NewStudent {
        program_id,
        first_name: register_request.first_name.trim().to_string(),
        last_name: register_request.last_name.trim().to_string(),
        middle_name: register_request
            .middle_name
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty()),
        gender: register_request.gender,
        contact_number: register_request.contact_number.trim().to_string(),
        date_of_birth: register_request.date_of_birth,
        address: register_request.address.trim().to_string(),
        city_address: register_request.city_address.trim().to_string(),
        email: register_request.email.trim().to_string(),
    };

    match storage.create_student(new_student).await {
        Ok(student) => {
            tracing::info!("Student {} registered", student.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                student,
                "Registration successful, use your student ID to login",
            )))
        }
        Err(e) => Ok(error_response(e, "Registration failed")),
    }
}

fn validate_form(form: &RegisterStudentRequest) -> Result<(), HttpResponse> {
    let bad_request =
        |code, msg: String| HttpResponse::BadRequest().json(ApiResponse::error_empty(code, msg));

    validate_name(form.first_name.trim(), "First name")
        .and_then(|_| validate_name(form.last_name.trim(), "Last name"))
        .map_err(|msg| bad_request(ErrorCode::BadRequest, msg))?;

    for (value, field) in [
        (&form.address, "Address"),
        (&form.city_address, "City address"),
    ] {
        if value.trim().is_empty() {
            return Err(bad_request(
                ErrorCode::BadRequest,
                format!("{field} is required"),
            ));
        }
    }

    validate_email(form.email.trim())
        .map_err(|msg| bad_request(ErrorCode::StudentEmailInvalid, msg.to_string()))?;
    validate_contact_number(form.contact_number.trim())
        .map_err(|msg| bad_request(ErrorCode::StudentContactInvalid, msg.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::Gender;
    use actix_web::http::StatusCode;

    fn form() -> RegisterStudentRequest {
        RegisterStudentRequest {
            first_name: "Juan".to_string(),
            last_name: "Dela Cruz".to_string(),
            middle_name: None,
            gender: Gender::Male,
            contact_number: "09171234567".to_string(),
            date_of_birth: chrono::NaiveDate::from_ymd_opt(2004, 5, 1).unwrap(),
            address: "123 Rizal St".to_string(),
            city_address: "Manila".to_string(),
            email: "juan@example.com".to_string(),
            program_code: Some("BSIT".to_string()),
        }
    }

    #[test]
    fn test_valid_form_passes() {
        assert!(validate_form(&form()).is_ok());
    }

    #[test]
    fn test_invalid_fields_rejected() {
        let mut bad_email = form();
        bad_email.email = "not-an-email".to_string();
        let resp = validate_form(&bad_email).unwrap_err();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let mut bad_contact = form();
        bad_contact.contact_number = "12345".to_string();
        assert!(validate_form(&bad_contact).is_err());

        let mut no_name = form();
        no_name.first_name = "   ".to_string();
        assert!(validate_form(&no_name).is_err());

        let mut no_city = form();
        no_city.city_address = String::new();
        assert!(validate_form(&no_city).is_err());
    }
}

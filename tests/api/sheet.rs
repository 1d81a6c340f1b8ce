use crate::helpers::{attendance_form, class_form, spawn_app};

fn count(haystack: &[u8], needle: &[u8]) -> usize {
    haystack
        .windows(needle.len())
        .filter(|w| *w == needle)
        .count()
}

#[tokio::test]
async fn attendance_sheet_has_one_photo_per_student_and_an_exact_footer() {
    let app = spawn_app().await;
    let teacher = app.teacher().await;
    let class = teacher.client.create_class(&class_form("Estatística")).await.unwrap();
    for i in 0..5 {
        teacher
            .client
            .register_attendance(&attendance_form(
                class.id,
                &format!("Aluno {}", i),
                &format!("20250{}", i),
            ))
            .await
            .unwrap();
    }
    teacher.client.end_class(class.id).await.unwrap();

    let token = teacher.client.token().unwrap().to_string();
    let response = app
        .get_with_token(
            &format!("/classes/{}/attendance-sheet", class.id),
            Some(&token),
        )
        .await;

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.headers()["content-type"], "application/pdf");
    let disposition = response.headers()["content-disposition"].to_str().unwrap().to_string();
    assert!(disposition.starts_with("attachment"));
    assert!(disposition.contains("ata-Estat"));
    assert!(disposition.contains("10-03-2025.pdf"));

    let bytes = response.bytes().await.unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
    assert!(count(&bytes, b"/Subtype /Image") >= 5);
    assert_eq!(count(&bytes, b"(Total students present: 5) Tj"), 1);
}

#[tokio::test]
async fn attendance_sheet_through_the_client() {
    let app = spawn_app().await;
    let teacher = app.teacher().await;
    let class = teacher.client.create_class(&class_form("Vazia")).await.unwrap();

    let bytes = teacher.client.attendance_sheet(class.id).await.unwrap();

    assert_eq!(count(&bytes, b"/Subtype /Image"), 0);
    assert_eq!(count(&bytes, b"(Total students present: 0) Tj"), 1);
}

#[tokio::test]
async fn attendance_sheet_of_another_teacher_is_not_found() {
    let app = spawn_app().await;
    let owner = app.teacher().await;
    let intruder = app.teacher().await;
    let class = owner.client.create_class(&class_form("Privada")).await.unwrap();

    let token = intruder.client.token().unwrap().to_string();
    let response = app
        .get_with_token(
            &format!("/classes/{}/attendance-sheet", class.id),
            Some(&token),
        )
        .await;

    assert_eq!(response.status().as_u16(), 404);
}

use ata_digital::{client::ClientError, domain::ClassStatus};

use crate::helpers::{attendance_form, class_form, spawn_app};

#[tokio::test]
async fn created_classes_start_active_and_are_listed_newest_first() {
    let app = spawn_app().await;
    let teacher = app.teacher().await;

    let first = teacher.client.create_class(&class_form("Cálculo I")).await.unwrap();
    let second = teacher.client.create_class(&class_form("Física II")).await.unwrap();

    let classes = teacher.client.classes().await.unwrap();
    assert_eq!(classes.len(), 2);
    assert_eq!(classes[0].id, second.id);
    assert_eq!(classes[1].id, first.id);

    let class = teacher.client.class(first.id).await.unwrap();
    assert_eq!(class.name, "Cálculo I");
    assert_eq!(class.start_time, "19:00");
    assert_eq!(class.duration, 100);
    assert_eq!(class.status, ClassStatus::Active);
}

#[tokio::test]
async fn class_json_uses_the_front_end_field_names() {
    let app = spawn_app().await;
    let teacher = app.teacher().await;
    let created = teacher.client.create_class(&class_form("Redes")).await.unwrap();
    let token = teacher.client.token().unwrap().to_string();

    let response = app
        .get_with_token(&format!("/classes/{}", created.id), Some(&token))
        .await;

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["startTime"], "19:00");
    assert_eq!(body["date"], "2025-03-10");
    assert_eq!(body["status"], "active");
}

#[tokio::test]
async fn invalid_classes_are_rejected() {
    let app = spawn_app().await;
    let teacher = app.teacher().await;
    let mut form = class_form("Álgebra");
    form.duration = 0;

    let result = teacher.client.create_class(&form).await;

    assert!(matches!(result, Err(ClientError::Api { status: 400, .. })));

    let mut form = class_form("Álgebra");
    form.date = "amanhã".to_string();
    assert!(matches!(
        teacher.client.create_class(&form).await,
        Err(ClientError::Api { status: 400, .. })
    ));
}

#[tokio::test]
async fn classes_are_private_to_their_owner() {
    let app = spawn_app().await;
    let owner = app.teacher().await;
    let intruder = app.teacher().await;
    let created = owner.client.create_class(&class_form("Química")).await.unwrap();

    assert!(intruder.client.classes().await.unwrap().is_empty());
    for result in [
        intruder.client.class(created.id).await.map(|_| ()),
        intruder.client.end_class(created.id).await.map(|_| ()),
        intruder.client.delete_class(created.id).await.map(|_| ()),
    ] {
        assert!(matches!(result, Err(ClientError::Api { status: 404, .. })));
    }

    let class = owner.client.class(created.id).await.unwrap();
    assert_eq!(class.status, ClassStatus::Active);
}

#[tokio::test]
async fn ending_a_class_twice_leaves_it_ended() {
    let app = spawn_app().await;
    let teacher = app.teacher().await;
    let created = teacher.client.create_class(&class_form("História")).await.unwrap();

    teacher.client.end_class(created.id).await.unwrap();
    teacher.client.end_class(created.id).await.unwrap();

    let class = teacher.client.class(created.id).await.unwrap();
    assert_eq!(class.status, ClassStatus::Ended);
}

#[tokio::test]
async fn deleting_a_class_removes_its_attendance() {
    let app = spawn_app().await;
    let teacher = app.teacher().await;
    let created = teacher.client.create_class(&class_form("Biologia")).await.unwrap();
    for (nome, matricula) in [("Ana", "1"), ("Bruno", "2"), ("Carla", "3")] {
        teacher
            .client
            .register_attendance(&attendance_form(created.id, nome, matricula))
            .await
            .unwrap();
    }
    assert_eq!(app.attendance_rows(created.id).await, 3);

    teacher.client.delete_class(created.id).await.unwrap();

    assert_eq!(app.attendance_rows(created.id).await, 0);
    assert!(teacher
        .client
        .class_attendance(created.id)
        .await
        .unwrap()
        .is_empty());
    assert!(matches!(
        teacher.client.class(created.id).await,
        Err(ClientError::Api { status: 404, .. })
    ));
}

#[tokio::test]
async fn missing_classes_are_not_found() {
    let app = spawn_app().await;
    let teacher = app.teacher().await;

    assert!(matches!(
        teacher.client.end_class(9999).await,
        Err(ClientError::Api { status: 404, .. })
    ));
    assert!(matches!(
        teacher.client.delete_class(9999).await,
        Err(ClientError::Api { status: 404, .. })
    ));
}

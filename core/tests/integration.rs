//! Full user lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then exercises every client
//! operation over real HTTP through the default network connectors.

use users_client::{ApiError, Auth, Connectors, CreateUser, UpdateUser, UsersClient};

#[test]
fn user_lifecycle() {
    // Step 1: start mock server on a random port.
    let addr = mock_server::spawn().unwrap();
    let client = UsersClient::new(
        &format!("http://{addr}"),
        Auth::Token("integration".to_string()),
        Connectors::network(),
    )
    .unwrap();

    // Step 2: list: should be empty.
    let users = client.list_users(None, None).unwrap();
    assert!(users.is_empty(), "expected empty list");

    // Step 3: create two users.
    let octo = client
        .create_user(&CreateUser {
            login: "octo".to_string(),
            name: None,
            admin: false,
        })
        .unwrap();
    assert_eq!(octo.login, "octo");
    assert!(!octo.admin);
    client
        .create_user(&CreateUser {
            login: "hubot".to_string(),
            name: Some("Hubot".to_string()),
            admin: true,
        })
        .unwrap();

    // Step 4: get the first user.
    let fetched = client.get_user(octo.id).unwrap();
    assert_eq!(fetched, octo);

    // Step 5: paginate.
    let second_page = client.list_users(Some(2), Some(1)).unwrap();
    assert_eq!(second_page.len(), 1);
    assert_eq!(second_page[0].login, "hubot");

    // Step 6: partial update.
    let updated = client
        .update_user(
            octo.id,
            &UpdateUser {
                name: Some("Octo Cat".to_string()),
                admin: None,
            },
        )
        .unwrap();
    assert_eq!(updated.name.as_deref(), Some("Octo Cat"));
    assert!(!updated.admin);

    // Step 7: binary upload.
    let avatar = client
        .upload_avatar(octo.id, "image/png", vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a])
        .unwrap();
    assert_eq!(avatar.user_id, octo.id);
    assert_eq!(avatar.size, 6);
    assert_eq!(avatar.content_type.as_deref(), Some("image/png"));

    // Step 8: delete, then the user is gone.
    client.delete_user(octo.id).unwrap();
    let err = client.get_user(octo.id).unwrap_err();
    assert!(matches!(err, ApiError::NotFound));
    let err = client.delete_user(octo.id).unwrap_err();
    assert!(matches!(err, ApiError::NotFound));
}

#[test]
fn connection_refused_surfaces_as_transport_error() {
    // Bind and drop a listener so the port is very likely closed.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let client = UsersClient::new(&format!("http://{addr}"), Auth::None, Connectors::network()).unwrap();

    let err = client.list_users(None, None).unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

//! JSONPlaceholder Example
//!
//! Demonstrates building a typed API client on top of `BaseClient`.

// Example-specific lint allowances
#![allow(missing_docs)]
#![allow(clippy::print_stdout)]
#![allow(dead_code)]

use std::error::Error;

use apiclient::prelude::*;
use apiclient::{ConfigError, PageParams};

const BASE_URL: &str = "https://jsonplaceholder.typicode.com";

// ============================================================================
// Data Types
// ============================================================================

/// A todo item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    #[serde(rename = "userId")]
    pub user_id: u64,
    pub id: u64,
    pub title: String,
    pub completed: bool,
}

/// Payload to create a todo item.
#[derive(Debug, Clone, Serialize)]
pub struct NewTodo {
    #[serde(rename = "userId")]
    pub user_id: u64,
    pub title: String,
    pub completed: bool,
}

// ============================================================================
// Client
// ============================================================================

type JsonClient<T> =
    BaseClient<HyperTransport, NoAuthentication, JsonRequestFormatter, JsonResponseHandler<T>>;

/// JSONPlaceholder client.
///
/// Each inner client decodes a different response shape; they share one
/// transport and its connection pool.
#[derive(Debug, Clone)]
pub struct JsonPlaceholderClient {
    todo: JsonClient<Todo>,
    todos: JsonClient<Vec<Todo>>,
}

impl JsonPlaceholderClient {
    /// Client for the public JSONPlaceholder service.
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_base_url(BASE_URL)
    }

    /// Client for a custom base URL.
    pub fn with_base_url(base_url: &str) -> Result<Self, ConfigError> {
        let transport = HyperTransport::new();
        let todo = BaseClient::builder(transport.clone())
            .authentication(NoAuthentication)
            .request_formatter(JsonRequestFormatter)
            .response_handler(JsonResponseHandler::new())
            .base_url(base_url)
            .build()?;
        let todos = BaseClient::new(
            transport,
            NoAuthentication,
            JsonResponseHandler::new(),
            JsonRequestFormatter,
            base_url,
        )?;
        Ok(Self { todo, todos })
    }

    pub async fn get_all_todos(&self) -> Result<Vec<Todo>, ClientError> {
        self.todos.read(&self.todos.endpoint("todos"), &[]).await
    }

    pub async fn get_todo(&self, todo_id: u64) -> Result<Todo, ClientError> {
        let url = self.todo.endpoint(&format!("todos/{todo_id}"));
        self.todo.read(&url, &[]).await
    }

    pub async fn get_user_todos(&self, user_id: u64) -> Result<Vec<Todo>, ClientError> {
        let user_id = user_id.to_string();
        self.todos
            .read(&self.todos.endpoint("todos"), &[("userId", &user_id)])
            .await
    }

    pub async fn create_todo(&self, todo: &NewTodo) -> Result<Todo, ClientError> {
        self.todo.create(&self.todo.endpoint("todos"), todo, &[]).await
    }

    pub async fn complete_todo(&self, todo_id: u64) -> Result<Todo, ClientError> {
        #[derive(Serialize)]
        struct Completed {
            completed: bool,
        }

        let url = self.todo.endpoint(&format!("todos/{todo_id}"));
        self.todo.update(&url, &Completed { completed: true }, &[]).await
    }

    /// Walk `/todos` with `_page`/`_limit` until an empty page.
    pub async fn get_todos_paginated(&self, limit: u32) -> Result<Vec<Todo>, ClientError> {
        let limit = limit.to_string();
        let pages = self
            .todos
            .read_paginated_by_query_params(
                &self.todos.endpoint("todos"),
                &[("_page", "1"), ("_limit", &limit)],
                |page, params| {
                    let current: u32 = params.get("_page")?.parse().ok()?;
                    (!page.is_empty())
                        .then(|| PageParams::from([("_page".into(), (current + 1).to_string())]))
                },
            )
            .await?;
        Ok(pages.into_iter().flatten().collect())
    }
}

// ============================================================================
// Main: Demonstrate usage
// ============================================================================

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let client = JsonPlaceholderClient::new()?;

    let todo = client.get_todo(45).await?;
    println!("Todo #45: {} (completed: {})", todo.title, todo.completed);

    let todos = client.get_all_todos().await?;
    println!("{} todos in total", todos.len());

    match client.get_todo(100_000).await {
        Ok(todo) => println!("Unexpected todo: {todo:?}"),
        Err(err @ ClientError::BadRequest { .. }) => println!("As expected: {err}"),
        Err(err) => return Err(err.into()),
    }

    Ok(())
}

// ============================================================================
// Tests using wiremock
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json_string, method, path, query_param},
    };

    fn todo(id: u64, user_id: u64, title: &str) -> Todo {
        Todo {
            user_id,
            id,
            title: title.to_string(),
            completed: false,
        }
    }

    fn client(server: &MockServer) -> JsonPlaceholderClient {
        JsonPlaceholderClient::with_base_url(&server.uri()).expect("client")
    }

    #[tokio::test]
    async fn test_get_todo() {
        let mock_server = MockServer::start().await;

        let expected = todo(45, 3, "velit soluta adipisci molestias reiciendis harum");
        Mock::given(method("GET"))
            .and(path("/todos/45"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&expected))
            .mount(&mock_server)
            .await;

        let_assert!(Ok(result) = client(&mock_server).get_todo(45).await);
        check!(result == expected);
    }

    #[tokio::test]
    async fn test_get_missing_todo() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/todos/100000"))
            .respond_with(ResponseTemplate::new(404).set_body_string("{}"))
            .mount(&mock_server)
            .await;

        let_assert!(Err(err) = client(&mock_server).get_todo(100_000).await);
        let_assert!(ClientError::BadRequest { status: 404, .. } = err);
    }

    #[tokio::test]
    async fn test_get_all_todos() {
        let mock_server = MockServer::start().await;

        let todos = vec![todo(1, 1, "first"), todo(2, 1, "second")];
        Mock::given(method("GET"))
            .and(path("/todos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&todos))
            .mount(&mock_server)
            .await;

        let_assert!(Ok(result) = client(&mock_server).get_all_todos().await);
        check!(result.len() == 2);
        check!(result.first().map(|it| it.title.as_str()) == Some("first"));
    }

    #[tokio::test]
    async fn test_get_user_todos() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/todos"))
            .and(query_param("userId", "7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(vec![todo(121, 7, "mine")]))
            .mount(&mock_server)
            .await;

        let_assert!(Ok(result) = client(&mock_server).get_user_todos(7).await);
        check!(result == vec![todo(121, 7, "mine")]);
    }

    #[tokio::test]
    async fn test_create_todo() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/todos"))
            .and(body_json_string(r#"{"userId":3,"title":"write docs","completed":false}"#))
            .respond_with(ResponseTemplate::new(201).set_body_json(todo(201, 3, "write docs")))
            .expect(1)
            .mount(&mock_server)
            .await;

        let new_todo = NewTodo {
            user_id: 3,
            title: "write docs".to_string(),
            completed: false,
        };
        let_assert!(Ok(created) = client(&mock_server).create_todo(&new_todo).await);
        check!(created.id == 201);
    }

    #[tokio::test]
    async fn test_complete_todo() {
        let mock_server = MockServer::start().await;

        let mut completed = todo(45, 3, "done");
        completed.completed = true;
        Mock::given(method("PATCH"))
            .and(path("/todos/45"))
            .and(body_json_string(r#"{"completed":true}"#))
            .respond_with(ResponseTemplate::new(200).set_body_json(&completed))
            .mount(&mock_server)
            .await;

        let_assert!(Ok(result) = client(&mock_server).complete_todo(45).await);
        check!(result.completed);
    }

    #[tokio::test]
    async fn test_get_todos_paginated() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/todos"))
            .and(query_param("_page", "1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(vec![todo(1, 1, "one"), todo(2, 1, "two")]),
            )
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/todos"))
            .and(query_param("_page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(vec![todo(3, 1, "three")]))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/todos"))
            .and(query_param("_page", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(Vec::<Todo>::new()))
            .mount(&mock_server)
            .await;

        let_assert!(Ok(result) = client(&mock_server).get_todos_paginated(2).await);
        let ids: Vec<u64> = result.iter().map(|it| it.id).collect();
        check!(ids == vec![1, 2, 3]);
    }
}

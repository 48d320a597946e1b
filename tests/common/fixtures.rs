//! Test fixtures for Confluence API responses
//!
//! Realistic payloads shaped like those returned by Confluence Server's
//! `/rest/api` endpoints.

use serde_json::{Value, json};

// A page with storage body and space expanded
pub fn sample_page() -> Value {
  json!({
    "id": "123456",
    "type": "page",
    "status": "current",
    "title": "Getting Started Guide",
    "body": {
      "storage": {
        "value": "<h1>Getting Started</h1><p>Welcome to our documentation!</p>",
        "representation": "storage"
      }
    },
    "space": {
      "key": "DOCS",
      "name": "Documentation",
      "type": "global"
    },
    "_links": {
      "webui": "/display/DOCS/Getting+Started+Guide",
      "self": "https://wiki.example.com/rest/api/content/123456",
      "tinyui": "/x/QOIB"
    }
  })
}

// A second page in the same space, only the view body expanded
pub fn sample_install_page() -> Value {
  json!({
    "id": "345678",
    "type": "page",
    "status": "current",
    "title": "Installation Guide",
    "body": {
      "view": {
        "value": "<p>Run the installer.</p>",
        "representation": "view"
      }
    },
    "space": {
      "key": "DOCS",
      "name": "Documentation",
      "type": "global"
    },
    "_links": {
      "webui": "/display/DOCS/Installation+Guide"
    }
  })
}

// A blog post with history and version expanded
pub fn sample_blog_post() -> Value {
  json!({
    "id": "901234",
    "type": "blogpost",
    "status": "current",
    "title": "Release 2.0 is out",
    "space": {
      "key": "ENG",
      "name": "Engineering",
      "type": "global"
    },
    "history": {
      "latest": true,
      "createdBy": {
        "type": "known",
        "username": "jdoe",
        "userKey": "ff8080815a1b2c3d",
        "displayName": "Jane Doe"
      },
      "createdDate": "2024-03-05T09:30:00.000Z"
    },
    "version": {
      "by": {
        "type": "known",
        "username": "jdoe",
        "userKey": "ff8080815a1b2c3d",
        "displayName": "Jane Doe"
      },
      "when": "2024-03-05T10:00:00.000Z",
      "message": "typo",
      "number": 2,
      "minorEdit": true
    },
    "_links": {
      "webui": "/display/ENG/2024/03/05/Release+2.0+is+out"
    }
  })
}

pub fn sample_space() -> Value {
  json!({
    "id": 98305,
    "key": "DOCS",
    "name": "Documentation",
    "type": "global",
    "status": "current",
    "description": {
      "plain": {
        "value": "Product documentation",
        "representation": "plain"
      }
    },
    "metadata": {
      "labels": {
        "results": [
          { "prefix": "global", "name": "docs", "id": "1" },
          { "prefix": "global", "name": "public", "id": "2" }
        ]
      }
    },
    "_links": {
      "webui": "/display/DOCS"
    }
  })
}

pub fn sample_personal_space() -> Value {
  json!({
    "id": 98306,
    "key": "~jdoe",
    "name": "Jane Doe",
    "type": "personal",
    "_links": {
      "webui": "/display/~jdoe"
    }
  })
}

pub fn sample_user() -> Value {
  json!({
    "type": "known",
    "username": "jdoe",
    "userKey": "ff8080815a1b2c3d",
    "displayName": "Jane Doe",
    "profilePicture": {
      "path": "/images/icons/profilepics/default.svg",
      "width": 48,
      "height": 48,
      "isDefault": true
    }
  })
}

pub fn sample_other_user() -> Value {
  json!({
    "type": "known",
    "username": "rroe",
    "userKey": "ff8080815a9e8d7c",
    "displayName": "Richard Roe"
  })
}

pub fn sample_anonymous_user() -> Value {
  json!({
    "type": "anonymous",
    "profilePicture": {
      "path": "/images/icons/profilepics/anonymous.svg",
      "width": 48,
      "height": 48,
      "isDefault": true
    },
    "displayName": "Anonymous"
  })
}

pub fn sample_group(name: &str) -> Value {
  json!({ "type": "group", "name": name })
}

pub fn sample_long_task() -> Value {
  json!({
    "id": "0f1e2d3c-4b5a-6978-8796-a5b4c3d2e1f0",
    "name": {
      "key": "com.atlassian.confluence.extra.flyingpdf.exporttaskname",
      "args": []
    },
    "elapsedTime": 5120,
    "percentageComplete": 100,
    "successful": true,
    "finished": true,
    "messages": [
      { "translation": "Finished PDF space export.", "args": [] }
    ]
  })
}

pub fn sample_running_task() -> Value {
  json!({
    "id": "a1b2c3d4-0000-1111-2222-333344445555",
    "name": {
      "key": "com.atlassian.confluence.spaces.export.task",
      "args": []
    },
    "elapsedTime": 800,
    "percentageComplete": 40,
    "successful": false,
    "finished": false,
    "messages": []
  })
}

/// Wrap `results` in a collection envelope; `next` is a link relative to the
/// base URL.
pub fn result_page(results: Vec<Value>, next: Option<&str>) -> Value {
  let size = results.len();
  let mut links = json!({
    "base": "https://wiki.example.com",
    "context": "",
    "self": "https://wiki.example.com/rest/api/content"
  });
  if let Some(next) = next {
    links["next"] = json!(next);
  }

  json!({
    "results": results,
    "start": 0,
    "limit": 25,
    "size": size,
    "_links": links
  })
}

use super::*;
use crate::config::ExtensionConfig;
use crate::kernels::zstd::fixtures;
use rusqlite::{params, Connection};
use std::sync::Arc;

fn setup_test_db() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    register_functions(&conn).unwrap();
    conn
}

fn query_blob(conn: &Connection, sql: &str, args: impl rusqlite::Params) -> Option<Vec<u8>> {
    conn.query_row(sql, args, |row| row.get(0)).unwrap()
}

fn query_error(conn: &Connection, sql: &str, args: impl rusqlite::Params) -> String {
    conn.query_row(sql, args, |row| row.get::<_, rusqlite::types::Value>(0))
        .unwrap_err()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Round-trips through SQL
    // -------------------------------------------------------------------------

    #[test]
    fn test_hello_world_through_sql() {
        let conn = setup_test_db();
        let compressed = query_blob(&conn, "SELECT zstd_compress(?1)", params![&b"hello world"[..]])
            .unwrap();

        let restored = query_blob(&conn, "SELECT zstd_decompress(?1)", params![compressed]);
        assert_eq!(restored.as_deref(), Some(&b"hello world"[..]));

        let length: Option<i64> = conn
            .query_row("SELECT zstd_length(?1)", params![compressed], |row| row.get(0))
            .unwrap();
        assert_eq!(length, Some(11));
    }

    #[test]
    fn test_text_and_empty_arguments() {
        let conn = setup_test_db();
        let restored = query_blob(&conn, "SELECT zstd_decompress(zstd_compress('plain text'))", []);
        assert_eq!(restored.as_deref(), Some(&b"plain text"[..]));

        let restored = query_blob(&conn, "SELECT zstd_decompress(zstd_compress(X''))", []);
        assert_eq!(restored.as_deref(), Some(&b""[..]));

        let length: i64 = conn
            .query_row("SELECT zstd_length(zstd_compress(X''))", [], |row| row.get(0))
            .unwrap();
        assert_eq!(length, 0);
    }

    #[test]
    fn test_dictionary_and_level_arguments() {
        let conn = setup_test_db();
        let data = b"user=alice;role=admin;team=storage;user=bob;role=admin".to_vec();
        let dict = b"user=;role=admin;team=storage;".to_vec();

        for level in [1i64, 3, 19] {
            let restored = query_blob(
                &conn,
                "SELECT zstd_decompress(zstd_compress(?1, ?2, ?3), ?2)",
                params![data, dict, level],
            );
            assert_eq!(restored.as_deref(), Some(&data[..]));
        }

        // NULL dictionary and NULL level fall back to no dictionary and the default level.
        let explicit = query_blob(&conn, "SELECT zstd_compress(?1, X'', 3)", params![data]);
        let defaulted = query_blob(&conn, "SELECT zstd_compress(?1, NULL, NULL)", params![data]);
        assert_eq!(explicit, defaulted);
    }

    #[test]
    fn test_compressed_column_in_a_table() {
        let conn = setup_test_db();
        conn.execute("CREATE TABLE docs (id INTEGER PRIMARY KEY, body BLOB)", [])
            .unwrap();

        let body = "lorem ipsum dolor sit amet ".repeat(200);
        conn.execute(
            "INSERT INTO docs (body) VALUES (zstd_compress(?1, NULL, 9))",
            params![body.as_bytes()],
        )
        .unwrap();

        let (stored, length): (usize, i64) = conn
            .query_row(
                "SELECT length(body), zstd_length(body) FROM docs WHERE id = 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert!(stored < body.len());
        assert_eq!(length, body.len() as i64);

        let restored = query_blob(&conn, "SELECT zstd_decompress(body) FROM docs WHERE id = 1", []);
        assert_eq!(restored.as_deref(), Some(body.as_bytes()));
    }

    // -------------------------------------------------------------------------
    // NULL handling
    // -------------------------------------------------------------------------

    #[test]
    fn test_null_propagation() {
        let conn = setup_test_db();
        for sql in [
            "SELECT zstd_compress(NULL)",
            "SELECT zstd_compress(NULL, X'AABB', 5)",
            "SELECT zstd_decompress(NULL)",
            "SELECT zstd_decompress(NULL, X'AABB')",
        ] {
            assert_eq!(query_blob(&conn, sql, []), None, "{sql}");
        }

        let length: Option<i64> = conn
            .query_row("SELECT zstd_length(NULL)", [], |row| row.get(0))
            .unwrap();
        assert_eq!(length, None);
    }

    #[test]
    fn test_unknown_content_size_through_sql() {
        let conn = setup_test_db();
        let frame = fixtures::frame_without_content_size(b"streamed");

        let length: Option<i64> = conn
            .query_row("SELECT zstd_length(?1)", params![frame], |row| row.get(0))
            .unwrap();
        assert_eq!(length, None);

        let message = query_error(&conn, "SELECT zstd_decompress(?1)", params![frame]);
        assert!(message.contains("returned unknown"), "{message}");
    }

    // -------------------------------------------------------------------------
    // Errors surface as statement errors
    // -------------------------------------------------------------------------

    #[test]
    fn test_codec_errors_are_statement_errors() {
        let conn = setup_test_db();

        let message = query_error(&conn, "SELECT zstd_decompress(X'00112233445566')", []);
        assert!(message.contains("ZSTD_getFrameContentSize failed"), "{message}");

        let frame = fixtures::header_with_content_size(i32::MAX as u64 + 1);
        let message = query_error(&conn, "SELECT zstd_length(?1)", params![frame]);
        assert!(message.contains("greater than i32::MAX"), "{message}");

        let frame = fixtures::header_with_content_size(64);
        let message = query_error(&conn, "SELECT zstd_decompress(?1)", params![frame]);
        assert!(message.contains("ZSTD_decompress_usingDict failed"), "{message}");

        // The connection keeps working after a failed call.
        let restored = query_blob(&conn, "SELECT zstd_decompress(zstd_compress('ok'))", []);
        assert_eq!(restored.as_deref(), Some(&b"ok"[..]));
    }

    #[test]
    fn test_argument_errors() {
        let conn = setup_test_db();

        let message = query_error(&conn, "SELECT zstd_compress()", []);
        assert!(message.contains("takes 1 to 3 arguments"), "{message}");

        let message = query_error(&conn, "SELECT zstd_decompress(X'00', X'00', X'00')", []);
        assert!(message.contains("takes 1 to 2 arguments"), "{message}");

        let message = query_error(&conn, "SELECT zstd_compress(42)", []);
        assert!(message.contains("must be BLOB"), "{message}");

        let message = query_error(&conn, "SELECT zstd_compress('x', NULL, 'high')", []);
        assert!(message.contains("level must be INTEGER"), "{message}");

        let message = query_error(&conn, "SELECT zstd_compress('x', NULL, 4294967296)", []);
        assert!(message.contains("out of range"), "{message}");
    }

    // -------------------------------------------------------------------------
    // Registration
    // -------------------------------------------------------------------------

    #[test]
    fn test_custom_prefix() {
        let conn = Connection::open_in_memory().unwrap();
        let config = ExtensionConfig {
            function_prefix: "pgzstd_".to_string(),
            ..ExtensionConfig::default()
        };
        register_functions_with_config(&conn, Arc::new(config)).unwrap();

        let length: i64 = conn
            .query_row("SELECT pgzstd_length(pgzstd_compress('abc'))", [], |row| row.get(0))
            .unwrap();
        assert_eq!(length, 3);

        let message = query_error(&conn, "SELECT zstd_compress('abc')", []);
        assert!(message.contains("no such function"), "{message}");
    }

    #[test]
    fn test_invalid_config_is_rejected_at_registration() {
        let conn = Connection::open_in_memory().unwrap();
        let config = ExtensionConfig {
            function_prefix: "drop table;".to_string(),
            ..ExtensionConfig::default()
        };
        assert!(register_functions_with_config(&conn, Arc::new(config)).is_err());
    }

    #[test]
    fn test_version() {
        let conn = setup_test_db();
        let version: String = conn
            .query_row("SELECT zstd_version()", [], |row| row.get(0))
            .unwrap();
        assert!(version.starts_with(&format!("zstd-bytea {}", crate::VERSION)));
        assert!(version.contains("libzstd"));
    }

    #[test]
    fn test_connections_on_many_threads_share_the_contexts() {
        let handles: Vec<_> = (0..4)
            .map(|t| {
                std::thread::spawn(move || {
                    let conn = setup_test_db();
                    for i in 0..50 {
                        let payload = format!("thread {t} iteration {i} ").repeat(20);
                        let restored = query_blob(
                            &conn,
                            "SELECT zstd_decompress(zstd_compress(?1))",
                            params![payload.as_bytes()],
                        );
                        assert_eq!(restored.as_deref(), Some(payload.as_bytes()));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }
}

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use sqlx::{Postgres, QueryBuilder};

use crate::{
    dto::pedidos::{
        CreatePedidoRequest, PedidoConProductos, PedidoCreado, PedidoQuery, UpdateEstadoRequest,
    },
    error::{AppError, AppResult},
    models::{LineaPedido, Pedido},
    response::Operacion,
    services::pedido_service,
    state::AppState,
    status::{estado_from_db, estado_to_db},
};

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(pedidos_get).post(crear_pedido).put(actualizar_estado),
    )
}

const SELECT_PEDIDO: &str = r#"
    SELECT p.*, pr.nombre as proveedor_nombre, u.nombre as creado_por_nombre
    FROM pedidos p
    LEFT JOIN proveedores pr ON p.proveedor_id = pr.id
    LEFT JOIN usuarios u ON p.creado_por = u.id
"#;

/// `GET /pedidos?id=` devuelve un pedido con sus líneas; sin id, el listado
/// filtrable. El filtro `estado` llega en vocabulario de frontend y se
/// traduce antes de consultar.
#[utoipa::path(get, path = "/api/pedidos", tag = "Pedidos")]
pub async fn pedidos_get(
    State(state): State<AppState>,
    Query(query): Query<PedidoQuery>,
) -> AppResult<Response> {
    if let Some(id) = query.id {
        let mut pedido: Pedido =
            sqlx::query_as(&format!("{SELECT_PEDIDO} WHERE p.id = $1"))
                .bind(id)
                .fetch_optional(&state.pool)
                .await?
                .ok_or_else(|| AppError::NotFound("Pedido no encontrado".into()))?;
        pedido.estado = estado_from_db(&pedido.estado);

        let productos = lineas_de_pedido(&state, id).await?;
        return Ok(Json(PedidoConProductos { pedido, productos }).into_response());
    }

    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(SELECT_PEDIDO);
    qb.push(" WHERE 1=1");

    if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
        let term = format!("%{search}%");
        qb.push(" AND (p.numero_pedido ILIKE ")
            .push_bind(term.clone())
            .push(" OR pr.nombre ILIKE ")
            .push_bind(term)
            .push(")");
    }

    if let Some(estado) = query
        .estado
        .as_deref()
        .filter(|e| !e.is_empty() && *e != "all")
    {
        qb.push(" AND p.estado = ").push_bind(estado_to_db(estado));
    }

    qb.push(" ORDER BY p.fecha_creacion DESC");

    let pedidos: Vec<Pedido> = qb.build_query_as().fetch_all(&state.pool).await?;

    let mut resultado = Vec::with_capacity(pedidos.len());
    for mut pedido in pedidos {
        pedido.estado = estado_from_db(&pedido.estado);
        let productos = lineas_de_pedido(&state, pedido.id).await?;
        resultado.push(PedidoConProductos { pedido, productos });
    }

    Ok(Json(resultado).into_response())
}

#[utoipa::path(post, path = "/api/pedidos", request_body = CreatePedidoRequest, tag = "Pedidos")]
pub async fn crear_pedido(
    State(state): State<AppState>,
    Json(payload): Json<CreatePedidoRequest>,
) -> AppResult<(StatusCode, Json<PedidoCreado>)> {
    let creado = pedido_service::crear_pedido(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(creado)))
}

#[utoipa::path(put, path = "/api/pedidos", request_body = UpdateEstadoRequest, tag = "Pedidos")]
pub async fn actualizar_estado(
    State(state): State<AppState>,
    Query(query): Query<PedidoQuery>,
    Json(payload): Json<UpdateEstadoRequest>,
) -> AppResult<Json<Operacion>> {
    let pedido_id = payload
        .id
        .or(query.id)
        .ok_or_else(|| AppError::BadRequest("ID de pedido requerido".into()))?;

    let resultado = pedido_service::actualizar_estado(&state, pedido_id, &payload).await?;
    Ok(Json(resultado))
}

async fn lineas_de_pedido(state: &AppState, pedido_id: i32) -> AppResult<Vec<LineaPedido>> {
    let lineas: Vec<LineaPedido> = sqlx::query_as(
        r#"
        SELECT pp.*, pr.nombre as producto_nombre
        FROM pedido_productos pp
        LEFT JOIN productos pr ON pp.producto_id = pr.id
        WHERE pp.pedido_id = $1
        "#,
    )
    .bind(pedido_id)
    .fetch_all(&state.pool)
    .await?;
    Ok(lineas)
}

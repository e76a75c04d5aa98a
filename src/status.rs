//! Vocabulario de estados de pedido.
//!
//! El frontend maneja: pendiente, confirmado, enviado, entregado, cancelado.
//! La base de datos persiste: pendiente, enviado, en_transito, entregado,
//! cancelado (`confirmado` se guarda como `en_transito`). Filas antiguas
//! pueden contener los nombres en inglés (created, confirmed, shipped,
//! delivered, cancelled) y deben seguir decodificando.
//!
//! Ambas funciones devuelven la entrada sin cambios cuando el valor no está
//! en la tabla. Es una soltura heredada que se conserva por compatibilidad
//! con filas ya guardadas; la frontera HTTP valida contra
//! [`ESTADOS_PERMITIDOS`] y [`ESTADOS_VALIDOS_BD`] antes de llegar aquí, de
//! modo que el passthrough solo es alcanzable al decodificar datos
//! existentes.

/// Estados que acepta la API en una petición de cambio de estado.
pub const ESTADOS_PERMITIDOS: [&str; 6] = [
    "pendiente",
    "confirmado",
    "enviado",
    "en_transito",
    "entregado",
    "cancelado",
];

/// Valores admitidos en la columna `pedidos.estado`.
pub const ESTADOS_VALIDOS_BD: [&str; 5] = [
    "pendiente",
    "enviado",
    "en_transito",
    "entregado",
    "cancelado",
];

/// Mapea un estado en vocabulario de frontend al valor persistido.
pub fn estado_to_db(estado: &str) -> String {
    match estado {
        "pendiente" => "pendiente",
        "confirmado" => "en_transito",
        "enviado" => "enviado",
        "entregado" => "entregado",
        "cancelado" => "cancelado",
        // Compatibilidad con valores antiguos
        "en_transito" => "en_transito",
        "created" => "pendiente",
        "confirmed" => "en_transito",
        "shipped" => "enviado",
        "delivered" => "entregado",
        "cancelled" => "cancelado",
        otro => otro,
    }
    .to_string()
}

/// Mapea un estado persistido al vocabulario del frontend.
pub fn estado_from_db(estado: &str) -> String {
    match estado {
        "pendiente" => "pendiente",
        "enviado" => "enviado",
        "en_transito" => "confirmado",
        "entregado" => "entregado",
        "cancelado" => "cancelado",
        // Compatibilidad con valores antiguos
        "created" => "pendiente",
        "confirmed" => "confirmado",
        "confirmado" => "confirmado",
        "shipped" => "enviado",
        "delivered" => "entregado",
        "cancelled" => "cancelado",
        otro => otro,
    }
    .to_string()
}

/// True si el valor persistido representa un pedido entregado, en cualquiera
/// de sus grafías históricas.
pub fn es_entregado(estado_bd: &str) -> bool {
    estado_bd == "entregado" || estado_from_db(estado_bd) == "entregado"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ida_y_vuelta_de_los_cinco_estados_canonicos() {
        for estado in ["pendiente", "confirmado", "enviado", "entregado", "cancelado"] {
            let bd = estado_to_db(estado);
            assert!(
                ESTADOS_VALIDOS_BD.contains(&bd.as_str()),
                "{bd} no es un valor válido de BD"
            );
            assert_eq!(estado_from_db(&bd), estado);
        }
    }

    #[test]
    fn confirmado_se_persiste_como_en_transito() {
        assert_eq!(estado_to_db("confirmado"), "en_transito");
        assert_eq!(estado_from_db("en_transito"), "confirmado");
    }

    #[test]
    fn los_nombres_ingleses_antiguos_decodifican() {
        assert_eq!(estado_from_db("created"), "pendiente");
        assert_eq!(estado_from_db("confirmed"), "confirmado");
        assert_eq!(estado_from_db("shipped"), "enviado");
        assert_eq!(estado_from_db("delivered"), "entregado");
        assert_eq!(estado_from_db("cancelled"), "cancelado");

        assert_eq!(estado_to_db("created"), "pendiente");
        assert_eq!(estado_to_db("delivered"), "entregado");
    }

    #[test]
    fn un_valor_desconocido_pasa_sin_cambios() {
        // Soltura heredada: la frontera HTTP debe validar antes.
        assert_eq!(estado_to_db("archivado"), "archivado");
        assert_eq!(estado_from_db("archivado"), "archivado");
        assert!(!ESTADOS_PERMITIDOS.contains(&"archivado"));
    }

    #[test]
    fn entregado_detecta_grafias_historicas() {
        assert!(es_entregado("entregado"));
        assert!(es_entregado("delivered"));
        assert!(!es_entregado("en_transito"));
        assert!(!es_entregado("pendiente"));
    }
}

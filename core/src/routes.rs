//! Route table for the checkout API.
//!
//! Every backend path is produced by [`Route::path`], a pure formatting
//! function keyed by the route variant. Identifiers are inserted verbatim and
//! in the order given; no defaults are substituted for empty ids.

/// Prefix shared by every checkout route.
pub const BASE_PATH: &str = "/api/checkout/pub";

/// A checkout endpoint with its identifiers bound.
///
/// `query` on [`Route::AddItem`] and [`Route::Simulation`] is appended as-is,
/// normally the output of [`crate::context::channel_query`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    OrderForm,
    AddItem {
        order_form_id: &'a str,
        query: &'a str,
    },
    UpdateItems {
        order_form_id: &'a str,
    },
    AssemblyOptions {
        order_form_id: &'a str,
        item_id: &'a str,
        assembly_options_id: &'a str,
    },
    AttachmentsData {
        order_form_id: &'a str,
        field: &'a str,
    },
    OrderFormCustomData {
        order_form_id: &'a str,
        app_id: &'a str,
        field: &'a str,
    },
    Profile {
        order_form_id: &'a str,
    },
    Checkin {
        order_form_id: &'a str,
    },
    InsertCoupon {
        order_form_id: &'a str,
    },
    ClearMessages {
        order_form_id: &'a str,
    },
    CancelOrder {
        order_form_id: &'a str,
    },
    Orders,
    Simulation {
        query: &'a str,
    },
}

impl Route<'_> {
    /// Resolve to the path below the backend host, e.g.
    /// `/api/checkout/pub/orderForm/abc/items?sc=1`.
    pub fn path(&self) -> String {
        match *self {
            Route::OrderForm => format!("{BASE_PATH}/orderForm"),
            Route::AddItem {
                order_form_id,
                query,
            } => format!("{BASE_PATH}/orderForm/{order_form_id}/items{query}"),
            Route::UpdateItems { order_form_id } => {
                format!("{BASE_PATH}/orderForm/{order_form_id}/items/update")
            }
            Route::AssemblyOptions {
                order_form_id,
                item_id,
                assembly_options_id,
            } => format!(
                "{BASE_PATH}/orderForm/{order_form_id}/items/{item_id}/assemblyOptions/{assembly_options_id}"
            ),
            Route::AttachmentsData {
                order_form_id,
                field,
            } => format!("{BASE_PATH}/orderForm/{order_form_id}/attachments/{field}"),
            Route::OrderFormCustomData {
                order_form_id,
                app_id,
                field,
            } => format!("{BASE_PATH}/orderForm/{order_form_id}/customData/{app_id}/{field}"),
            Route::Profile { order_form_id } => {
                format!("{BASE_PATH}/orderForm/{order_form_id}/profile")
            }
            Route::Checkin { order_form_id } => {
                format!("{BASE_PATH}/orderForm/{order_form_id}/checkIn")
            }
            Route::InsertCoupon { order_form_id } => {
                format!("{BASE_PATH}/orderForm/{order_form_id}/coupons")
            }
            Route::ClearMessages { order_form_id } => {
                format!("{BASE_PATH}/orderForm/{order_form_id}/messages/clear")
            }
            Route::CancelOrder { order_form_id } => {
                format!("{BASE_PATH}/orders/{order_form_id}/user-cancel-request")
            }
            Route::Orders => format!("{BASE_PATH}/orders"),
            Route::Simulation { query } => format!("{BASE_PATH}/orderForms/simulation{query}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_routes() {
        assert_eq!(Route::OrderForm.path(), "/api/checkout/pub/orderForm");
        assert_eq!(Route::Orders.path(), "/api/checkout/pub/orders");
    }

    #[test]
    fn add_item_appends_query_verbatim() {
        let with = Route::AddItem {
            order_form_id: "of1",
            query: "?sc=2",
        };
        let without = Route::AddItem {
            order_form_id: "of1",
            query: "",
        };
        assert_eq!(with.path(), "/api/checkout/pub/orderForm/of1/items?sc=2");
        assert_eq!(without.path(), "/api/checkout/pub/orderForm/of1/items");
    }

    #[test]
    fn assembly_options_keeps_identifier_order() {
        let route = Route::AssemblyOptions {
            order_form_id: "of1",
            item_id: "3",
            assembly_options_id: "engraving",
        };
        assert_eq!(
            route.path(),
            "/api/checkout/pub/orderForm/of1/items/3/assemblyOptions/engraving"
        );
    }

    #[test]
    fn custom_data_keeps_identifier_order() {
        let route = Route::OrderFormCustomData {
            order_form_id: "of1",
            app_id: "my-app",
            field: "giftWrap",
        };
        assert_eq!(
            route.path(),
            "/api/checkout/pub/orderForm/of1/customData/my-app/giftWrap"
        );
    }

    #[test]
    fn attachment_field_is_free_form() {
        let route = Route::AttachmentsData {
            order_form_id: "of1",
            field: "openTextField",
        };
        assert_eq!(
            route.path(),
            "/api/checkout/pub/orderForm/of1/attachments/openTextField"
        );
    }

    #[test]
    fn cancel_order_uses_orders_prefix() {
        let route = Route::CancelOrder {
            order_form_id: "v123-01",
        };
        assert_eq!(
            route.path(),
            "/api/checkout/pub/orders/v123-01/user-cancel-request"
        );
    }

    #[test]
    fn empty_id_is_not_replaced() {
        let route = Route::Profile { order_form_id: "" };
        assert_eq!(route.path(), "/api/checkout/pub/orderForm//profile");
    }

    #[test]
    fn resolution_is_deterministic() {
        let route = Route::Simulation { query: "?sc=1" };
        assert_eq!(route.path(), route.path());
        assert_eq!(route.path(), "/api/checkout/pub/orderForms/simulation?sc=1");
    }
}

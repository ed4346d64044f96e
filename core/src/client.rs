//! Named checkout operations.
//!
//! # Design
//! `CheckoutClient` holds a `RequestDispatcher` and nothing else. Each method
//! resolves its `Route`, qualifies it with the sales channel where the
//! backend expects one, wraps the payload in the shape the endpoint takes,
//! and returns the dispatcher's result unchanged.

use std::fmt::Display;

use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::context::{channel_query, RequestContext};
use crate::dispatcher::{Call, RequestDispatcher};
use crate::error::DomainError;
use crate::http::Transport;
use crate::routes::Route;
use crate::types::{OrderForm, RawResponse, SimulationRequest};

#[derive(Serialize)]
struct OrderItems<'a, T: ?Sized> {
    #[serde(rename = "orderItems")]
    order_items: &'a T,
}

#[derive(Serialize)]
struct CancelReason<'a> {
    reason: &'a str,
}

#[derive(Serialize)]
struct CustomDataValue<'a, T: ?Sized> {
    value: &'a T,
}

#[derive(Serialize)]
struct IgnoreProfile {
    #[serde(rename = "ignoreProfileData")]
    ignore_profile_data: bool,
}

#[derive(Serialize)]
struct Payments<'a, T: ?Sized> {
    payments: &'a T,
}

#[derive(Serialize)]
struct CouponText<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct Empty {}

/// Checkout/cart client for the `/api/checkout/pub` surface.
///
/// Stateless across calls: every method takes the caller's
/// `RequestContext`, and concurrent calls share only the transport.
#[derive(Debug, Clone)]
pub struct CheckoutClient<T> {
    dispatcher: RequestDispatcher<T>,
}

impl<T: Transport> CheckoutClient<T> {
    /// `ctx` supplies the store user token sent as the identity header on
    /// every request made through this client.
    pub fn new(config: ClientConfig, transport: T, ctx: &RequestContext) -> Self {
        Self {
            dispatcher: RequestDispatcher::new(config, transport, ctx),
        }
    }

    pub fn dispatcher(&self) -> &RequestDispatcher<T> {
        &self.dispatcher
    }

    /// Get or create the session's order form.
    pub fn order_form(&self, ctx: &RequestContext) -> Result<OrderForm, DomainError> {
        let path = Route::OrderForm.path();
        self.dispatcher
            .create(Call::new(ctx, "checkout-orderForm", path), &Empty {})
    }

    /// [`Self::order_form`] with status and response headers (e.g.
    /// `set-cookie`) preserved.
    pub fn order_form_raw(
        &self,
        ctx: &RequestContext,
    ) -> Result<RawResponse<OrderForm>, DomainError> {
        let path = Route::OrderForm.path();
        self.dispatcher
            .create_raw(Call::new(ctx, "checkout-orderForm", path), &Empty {})
    }

    pub fn add_item<I>(
        &self,
        ctx: &RequestContext,
        order_form_id: &str,
        items: &I,
    ) -> Result<OrderForm, DomainError>
    where
        I: Serialize + ?Sized,
    {
        let query = channel_query(ctx);
        let path = Route::AddItem {
            order_form_id,
            query: &query,
        }
        .path();
        self.dispatcher.create(
            Call::new(ctx, "checkout-addItem", path),
            &OrderItems { order_items: items },
        )
    }

    pub fn update_items<I>(
        &self,
        ctx: &RequestContext,
        order_form_id: &str,
        order_items: &I,
    ) -> Result<OrderForm, DomainError>
    where
        I: Serialize + ?Sized,
    {
        let path = Route::UpdateItems { order_form_id }.path();
        self.dispatcher.create(
            Call::new(ctx, "checkout-updateItems", path),
            &OrderItems { order_items },
        )
    }

    pub fn cancel_order(
        &self,
        ctx: &RequestContext,
        order_form_id: &str,
        reason: &str,
    ) -> Result<Value, DomainError> {
        let path = Route::CancelOrder { order_form_id }.path();
        self.dispatcher.create(
            Call::new(ctx, "checkout-cancelOrder", path),
            &CancelReason { reason },
        )
    }

    pub fn set_order_form_custom_data<V>(
        &self,
        ctx: &RequestContext,
        order_form_id: &str,
        app_id: &str,
        field: &str,
        value: &V,
    ) -> Result<Value, DomainError>
    where
        V: Serialize + ?Sized,
    {
        let path = Route::OrderFormCustomData {
            order_form_id,
            app_id,
            field,
        }
        .path();
        self.dispatcher.replace(
            Call::new(ctx, "checkout-setOrderFormCustomData", path),
            &CustomDataValue { value },
        )
    }

    pub fn update_order_form_ignore_profile(
        &self,
        ctx: &RequestContext,
        order_form_id: &str,
        ignore_profile_data: bool,
    ) -> Result<Value, DomainError> {
        let path = Route::Profile { order_form_id }.path();
        self.dispatcher.patch(
            Call::new(ctx, "checkout-updateOrderFormIgnoreProfile", path),
            &IgnoreProfile {
                ignore_profile_data,
            },
        )
    }

    pub fn update_order_form_payment<P>(
        &self,
        ctx: &RequestContext,
        order_form_id: &str,
        payments: &P,
    ) -> Result<Value, DomainError>
    where
        P: Serialize + ?Sized,
    {
        let path = Route::AttachmentsData {
            order_form_id,
            field: "paymentData",
        }
        .path();
        self.dispatcher.create(
            Call::new(ctx, "checkout-updateOrderFormPayment", path),
            &Payments { payments },
        )
    }

    pub fn update_order_form_profile<P>(
        &self,
        ctx: &RequestContext,
        order_form_id: &str,
        fields: &P,
    ) -> Result<Value, DomainError>
    where
        P: Serialize + ?Sized,
    {
        self.post_attachment(
            ctx,
            order_form_id,
            "clientProfileData",
            "checkout-updateOrderFormProfile",
            fields,
        )
    }

    pub fn update_order_form_shipping<S>(
        &self,
        ctx: &RequestContext,
        order_form_id: &str,
        shipping: &S,
    ) -> Result<Value, DomainError>
    where
        S: Serialize + ?Sized,
    {
        self.post_attachment(
            ctx,
            order_form_id,
            "shippingData",
            "checkout-updateOrderFormShipping",
            shipping,
        )
    }

    pub fn update_order_form_marketing_data<M>(
        &self,
        ctx: &RequestContext,
        order_form_id: &str,
        marketing_data: &M,
    ) -> Result<Value, DomainError>
    where
        M: Serialize + ?Sized,
    {
        self.post_attachment(
            ctx,
            order_form_id,
            "marketingData",
            "checkout-updateOrderFormMarketingData",
            marketing_data,
        )
    }

    pub fn add_assembly_options<B>(
        &self,
        ctx: &RequestContext,
        order_form_id: &str,
        item_id: impl Display,
        assembly_options_id: &str,
        body: &B,
    ) -> Result<Value, DomainError>
    where
        B: Serialize + ?Sized,
    {
        let item_id = item_id.to_string();
        let path = Route::AssemblyOptions {
            order_form_id,
            item_id: &item_id,
            assembly_options_id,
        }
        .path();
        self.dispatcher
            .create(Call::new(ctx, "checkout-addAssemblyOptions", path), body)
    }

    /// DELETE carrying `body`, which names the sub-items to remove.
    pub fn remove_assembly_options<B>(
        &self,
        ctx: &RequestContext,
        order_form_id: &str,
        item_id: impl Display,
        assembly_options_id: &str,
        body: &B,
    ) -> Result<Value, DomainError>
    where
        B: Serialize + ?Sized,
    {
        let item_id = item_id.to_string();
        let path = Route::AssemblyOptions {
            order_form_id,
            item_id: &item_id,
            assembly_options_id,
        }
        .path();
        self.dispatcher
            .remove(Call::new(ctx, "checkout-removeAssemblyOptions", path), Some(body))
    }

    pub fn update_order_form_checkin<C>(
        &self,
        ctx: &RequestContext,
        order_form_id: &str,
        checkin: &C,
    ) -> Result<Value, DomainError>
    where
        C: Serialize + ?Sized,
    {
        let path = Route::Checkin { order_form_id }.path();
        self.dispatcher
            .create(Call::new(ctx, "checkout-updateOrderFormCheckin", path), checkin)
    }

    pub fn orders(&self, ctx: &RequestContext) -> Result<Value, DomainError> {
        let path = Route::Orders.path();
        self.dispatcher.fetch(Call::new(ctx, "checkout-orders", path))
    }

    pub fn simulation(
        &self,
        ctx: &RequestContext,
        simulation: &SimulationRequest,
    ) -> Result<Value, DomainError> {
        let query = channel_query(ctx);
        let path = Route::Simulation { query: &query }.path();
        self.dispatcher
            .create(Call::new(ctx, "checkout-simulation", path), simulation)
    }

    pub fn insert_coupon(
        &self,
        ctx: &RequestContext,
        order_form_id: &str,
        coupon: &str,
    ) -> Result<OrderForm, DomainError> {
        let path = Route::InsertCoupon { order_form_id }.path();
        self.dispatcher.create(
            Call::new(ctx, "checkout-insertCoupon", path),
            &CouponText { text: coupon },
        )
    }

    pub fn clear_messages(
        &self,
        ctx: &RequestContext,
        order_form_id: &str,
    ) -> Result<OrderForm, DomainError> {
        let path = Route::ClearMessages { order_form_id }.path();
        self.dispatcher
            .create(Call::new(ctx, "checkout-clearMessages", path), &Empty {})
    }

    fn post_attachment<B>(
        &self,
        ctx: &RequestContext,
        order_form_id: &str,
        field: &str,
        operation: &'static str,
        body: &B,
    ) -> Result<Value, DomainError>
    where
        B: Serialize + ?Sized,
    {
        let path = Route::AttachmentsData {
            order_form_id,
            field,
        }
        .path();
        self.dispatcher.create(Call::new(ctx, operation, path), body)
    }
}

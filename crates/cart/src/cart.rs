use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use refurb_catalog::Product;
use refurb_core::{Aggregate, AggregateRoot, CheckoutId, DomainError, ProductId, SessionId};
use refurb_events::Event;

/// One product/quantity pairing in the cart. `quantity` is always positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    pub fn product_id(&self) -> &ProductId {
        self.product.id()
    }

    /// Price of this line (`price * quantity`).
    pub fn line_total(&self) -> Decimal {
        self.product.price() * Decimal::from(self.quantity)
    }

    /// Discount of this line against list price (`(msrp - price) * quantity`).
    pub fn line_savings(&self) -> Decimal {
        self.product.unit_savings() * Decimal::from(self.quantity)
    }
}

/// Aggregate root: the shopper's cart for one session.
///
/// Lines keep insertion order; a product appears at most once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    id: SessionId,
    lines: Vec<CartLine>,
    checkout: Option<CheckoutId>,
    version: u64,
}

impl Cart {
    pub fn empty(id: SessionId) -> Self {
        Self {
            id,
            lines: Vec::new(),
            checkout: None,
            version: 0,
        }
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, product_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id().as_str() == product_id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of all line quantities.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Total discount against list price. Not clamped; can be negative.
    pub fn savings(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_savings).sum()
    }

    /// Checkout currently being processed, if any.
    pub fn checkout_in_flight(&self) -> Option<CheckoutId> {
        self.checkout
    }

    fn position(&self, product_id: &ProductId) -> Option<usize> {
        self.lines.iter().position(|l| l.product_id() == product_id)
    }

    /// Reject a change that would push `subtotal` or `savings` past what
    /// `Decimal` can represent. Totals are summed in line order, as
    /// [`Cart::subtotal`] and [`Cart::savings`] do.
    fn ensure_totals_fit(&self, product: &Product, quantity: u32) -> Result<(), DomainError> {
        let mut planned: Vec<(&Product, u32)> = self
            .lines
            .iter()
            .map(|l| {
                let q = if l.product_id() == product.id() { quantity } else { l.quantity };
                (&l.product, q)
            })
            .collect();
        if self.position(product.id()).is_none() {
            planned.push((product, quantity));
        }

        let out_of_range = || DomainError::validation("cart total out of range");
        let mut subtotal = Decimal::ZERO;
        let mut savings = Decimal::ZERO;
        for (p, q) in planned {
            let q = Decimal::from(q);
            subtotal = p
                .price()
                .checked_mul(q)
                .and_then(|line| subtotal.checked_add(line))
                .ok_or_else(out_of_range)?;
            savings = p
                .msrp()
                .checked_sub(p.price())
                .and_then(|unit| unit.checked_mul(q))
                .and_then(|line| savings.checked_add(line))
                .ok_or_else(out_of_range)?;
        }
        Ok(())
    }
}

impl AggregateRoot for Cart {
    type Id = SessionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: AddItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddItem {
    pub product: Product,
    pub quantity: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Command: SetQuantity. Zero or negative removes the line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetQuantity {
    pub product_id: ProductId,
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveItem {
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ClearCart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearCart {
    pub occurred_at: DateTime<Utc>,
}

/// Command: BeginCheckout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeginCheckout {
    pub checkout_id: CheckoutId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: CompleteCheckout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompleteCheckout {
    pub checkout_id: CheckoutId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartCommand {
    AddItem(AddItem),
    SetQuantity(SetQuantity),
    RemoveItem(RemoveItem),
    ClearCart(ClearCart),
    BeginCheckout(BeginCheckout),
    CompleteCheckout(CompleteCheckout),
}

/// Event: LineAdded (product was absent).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineAdded {
    pub product: Product,
    pub quantity: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Event: QuantityChanged. Carries the new absolute quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityChanged {
    pub product_id: ProductId,
    pub quantity: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Event: LineRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRemoved {
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: CartCleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartCleared {
    pub occurred_at: DateTime<Utc>,
}

/// Event: CheckoutStarted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutStarted {
    pub checkout_id: CheckoutId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: CheckoutCompleted. Totals are those of the cart being committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutCompleted {
    pub checkout_id: CheckoutId,
    pub item_count: u64,
    pub subtotal: Decimal,
    pub savings: Decimal,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartEvent {
    LineAdded(LineAdded),
    QuantityChanged(QuantityChanged),
    LineRemoved(LineRemoved),
    CartCleared(CartCleared),
    CheckoutStarted(CheckoutStarted),
    CheckoutCompleted(CheckoutCompleted),
}

impl Event for CartEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CartEvent::LineAdded(_) => "cart.line.added",
            CartEvent::QuantityChanged(_) => "cart.line.quantity_changed",
            CartEvent::LineRemoved(_) => "cart.line.removed",
            CartEvent::CartCleared(_) => "cart.cleared",
            CartEvent::CheckoutStarted(_) => "cart.checkout.started",
            CartEvent::CheckoutCompleted(_) => "cart.checkout.completed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            CartEvent::LineAdded(e) => e.occurred_at,
            CartEvent::QuantityChanged(e) => e.occurred_at,
            CartEvent::LineRemoved(e) => e.occurred_at,
            CartEvent::CartCleared(e) => e.occurred_at,
            CartEvent::CheckoutStarted(e) => e.occurred_at,
            CartEvent::CheckoutCompleted(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Cart {
    type Command = CartCommand;
    type Event = CartEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            CartEvent::LineAdded(e) => {
                self.lines.push(CartLine {
                    product: e.product.clone(),
                    quantity: e.quantity,
                });
            }
            CartEvent::QuantityChanged(e) => {
                if let Some(pos) = self.position(&e.product_id) {
                    self.lines[pos].quantity = e.quantity;
                }
            }
            CartEvent::LineRemoved(e) => {
                self.lines.retain(|l| l.product_id() != &e.product_id);
            }
            CartEvent::CartCleared(_) => {
                self.lines.clear();
            }
            CartEvent::CheckoutStarted(e) => {
                self.checkout = Some(e.checkout_id);
            }
            CartEvent::CheckoutCompleted(_) => {
                self.lines.clear();
                self.checkout = None;
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            CartCommand::AddItem(cmd) => self.handle_add(cmd),
            CartCommand::SetQuantity(cmd) => self.handle_set_quantity(cmd),
            CartCommand::RemoveItem(cmd) => Ok(self.handle_remove(cmd)),
            CartCommand::ClearCart(cmd) => Ok(self.handle_clear(cmd)),
            CartCommand::BeginCheckout(cmd) => self.handle_begin_checkout(cmd),
            CartCommand::CompleteCheckout(cmd) => self.handle_complete_checkout(cmd),
        }
    }
}

impl Cart {
    fn handle_add(&self, cmd: &AddItem) -> Result<Vec<CartEvent>, DomainError> {
        if cmd.quantity == 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }

        match self.position(cmd.product.id()) {
            Some(pos) => {
                let quantity = self.lines[pos]
                    .quantity
                    .checked_add(cmd.quantity)
                    .ok_or_else(|| DomainError::validation("quantity out of range"))?;
                self.ensure_totals_fit(&cmd.product, quantity)?;
                Ok(vec![CartEvent::QuantityChanged(QuantityChanged {
                    product_id: cmd.product.id().clone(),
                    quantity,
                    occurred_at: cmd.occurred_at,
                })])
            }
            None => {
                self.ensure_totals_fit(&cmd.product, cmd.quantity)?;
                Ok(vec![CartEvent::LineAdded(LineAdded {
                    product: cmd.product.clone(),
                    quantity: cmd.quantity,
                    occurred_at: cmd.occurred_at,
                })])
            }
        }
    }

    fn handle_set_quantity(&self, cmd: &SetQuantity) -> Result<Vec<CartEvent>, DomainError> {
        let Some(pos) = self.position(&cmd.product_id) else {
            return Ok(Vec::new());
        };

        if cmd.quantity <= 0 {
            return Ok(vec![CartEvent::LineRemoved(LineRemoved {
                product_id: cmd.product_id.clone(),
                occurred_at: cmd.occurred_at,
            })]);
        }

        let quantity = u32::try_from(cmd.quantity)
            .map_err(|_| DomainError::validation("quantity out of range"))?;
        if self.lines[pos].quantity == quantity {
            return Ok(Vec::new());
        }
        self.ensure_totals_fit(&self.lines[pos].product, quantity)?;

        Ok(vec![CartEvent::QuantityChanged(QuantityChanged {
            product_id: cmd.product_id.clone(),
            quantity,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_remove(&self, cmd: &RemoveItem) -> Vec<CartEvent> {
        if self.position(&cmd.product_id).is_none() {
            return Vec::new();
        }
        vec![CartEvent::LineRemoved(LineRemoved {
            product_id: cmd.product_id.clone(),
            occurred_at: cmd.occurred_at,
        })]
    }

    fn handle_clear(&self, cmd: &ClearCart) -> Vec<CartEvent> {
        if self.lines.is_empty() {
            return Vec::new();
        }
        vec![CartEvent::CartCleared(CartCleared {
            occurred_at: cmd.occurred_at,
        })]
    }

    fn handle_begin_checkout(&self, cmd: &BeginCheckout) -> Result<Vec<CartEvent>, DomainError> {
        if let Some(current) = self.checkout {
            return Err(DomainError::conflict(format!("checkout {current} already in flight")));
        }

        Ok(vec![CartEvent::CheckoutStarted(CheckoutStarted {
            checkout_id: cmd.checkout_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_complete_checkout(&self, cmd: &CompleteCheckout) -> Result<Vec<CartEvent>, DomainError> {
        if self.checkout != Some(cmd.checkout_id) {
            return Err(DomainError::conflict(format!(
                "checkout {} is not in flight",
                cmd.checkout_id
            )));
        }

        Ok(vec![CartEvent::CheckoutCompleted(CheckoutCompleted {
            checkout_id: cmd.checkout_id,
            item_count: self.item_count(),
            subtotal: self.subtotal(),
            savings: self.savings(),
            occurred_at: cmd.occurred_at,
        })])
    }
}

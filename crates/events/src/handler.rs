/// Execute an aggregate command in place: decide, then apply each event.
///
/// Returns the applied events so the caller can publish them. If `handle`
/// fails, the aggregate is left untouched.
pub fn execute<A>(
    aggregate: &mut A,
    command: &A::Command,
) -> Result<Vec<A::Event>, A::Error>
where
    A: refurb_core::Aggregate,
{
    let events = A::handle(aggregate, command)?;
    for ev in &events {
        A::apply(aggregate, ev);
    }
    Ok(events)
}

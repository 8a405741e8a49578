//! Unit tests for the scope stack and symbol arena.

use super::symbol_table::{ScopeError, SymId, Symbol, SymbolTable, Symbols};
use super::types::Ty;

fn int_var(symbols: &mut Symbols, name: &str) -> SymId {
    symbols.alloc(Symbol::var(name, Ty::Int))
}

#[test]
fn add_then_lookup_local_returns_the_entry() {
    let mut symbols = Symbols::new();
    let mut table = SymbolTable::new();
    table.add_scope();

    let a = int_var(&mut symbols, "a");
    table.add_decl("a", a).unwrap();

    assert_eq!(table.lookup_local("a").unwrap(), Some(a));
    assert_eq!(table.lookup_global("a").unwrap(), Some(a));
}

#[test]
fn innermost_binding_wins_and_unwinds() {
    let mut symbols = Symbols::new();
    let mut table = SymbolTable::new();

    table.add_scope();
    let outer = int_var(&mut symbols, "n");
    table.add_decl("n", outer).unwrap();

    table.add_scope();
    let inner = int_var(&mut symbols, "n");
    table.add_decl("n", inner).unwrap();

    assert_eq!(table.lookup_global("n").unwrap(), Some(inner));
    assert_eq!(table.lookup_local("n").unwrap(), Some(inner));

    table.remove_scope().unwrap();
    assert_eq!(table.lookup_global("n").unwrap(), Some(outer));
}

#[test]
fn lookup_global_searches_outer_frames() {
    let mut symbols = Symbols::new();
    let mut table = SymbolTable::new();

    table.add_scope();
    let a = int_var(&mut symbols, "a");
    table.add_decl("a", a).unwrap();
    table.add_scope();

    assert_eq!(table.lookup_local("a").unwrap(), None);
    assert_eq!(table.lookup_global("a").unwrap(), Some(a));
}

#[test]
fn zero_frame_table_fails_empty_scope() {
    let mut symbols = Symbols::new();
    let mut table = SymbolTable::new();
    let a = int_var(&mut symbols, "a");

    assert_eq!(table.remove_scope(), Err(ScopeError::EmptyScope));
    assert_eq!(table.add_decl("a", a), Err(ScopeError::EmptyScope));
    assert_eq!(table.lookup_local("a"), Err(ScopeError::EmptyScope));
    assert_eq!(table.lookup_global("a"), Err(ScopeError::EmptyScope));
}

#[test]
fn duplicate_in_same_frame_rejected() {
    let mut symbols = Symbols::new();
    let mut table = SymbolTable::new();
    table.add_scope();

    let first = int_var(&mut symbols, "x");
    let second = int_var(&mut symbols, "x");
    table.add_decl("x", first).unwrap();

    assert_eq!(
        table.add_decl("x", second),
        Err(ScopeError::Duplicate("x".to_string()))
    );
    // The original binding survives.
    assert_eq!(table.lookup_local("x").unwrap(), Some(first));
}

#[test]
fn empty_name_rejected() {
    let mut symbols = Symbols::new();
    let mut table = SymbolTable::new();
    table.add_scope();
    let a = int_var(&mut symbols, "a");

    assert_eq!(table.add_decl("", a), Err(ScopeError::IllegalArgument));
}

#[test]
fn struct_entries_link_through_the_arena() {
    let mut symbols = Symbols::new();

    let x = int_var(&mut symbols, "x");
    let y = int_var(&mut symbols, "y");
    let mut fields = indexmap::IndexMap::new();
    fields.insert("x".to_string(), x);
    fields.insert("y".to_string(), y);
    let fields_id = symbols.alloc_fields(fields);
    let def = symbols.alloc(Symbol::struct_def("P", fields_id));
    let var = symbols.alloc(Symbol::struct_var("p", "P", def));

    assert_eq!(symbols.fields_of_var(var), Some(fields_id));
    assert_eq!(symbols.lookup_field(fields_id, "x"), Some(x));
    assert_eq!(symbols.lookup_field(fields_id, "z"), None);
    assert_eq!(symbols.size_of(var), 8);
    assert_eq!(symbols.size_of(x), 4);
}

#[test]
fn dump_lists_frames_innermost_first() {
    let mut symbols = Symbols::new();
    let mut table = SymbolTable::new();

    table.add_scope();
    let g = int_var(&mut symbols, "g");
    table.add_decl("g", g).unwrap();
    table.add_scope();
    let l = symbols.alloc(Symbol::var("l", Ty::Bool));
    table.add_decl("l", l).unwrap();

    let dump = table.dump(&symbols);
    assert!(dump.contains("scope 0\n    l: bool"));
    assert!(dump.contains("scope 1\n    g: int"));
}
